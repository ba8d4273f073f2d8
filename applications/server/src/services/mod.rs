/// Server services
pub mod clock_sink;
pub mod event_log;
pub mod ytdlp;

pub use clock_sink::ClockSink;
pub use event_log::EventLog;
pub use ytdlp::YtDlpResolver;
