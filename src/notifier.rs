/// User-facing toast notifications. Fire-and-forget: implementations must
/// not fail and callers never wait on them.
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn warn(&self, message: &str);
}

/// Routes notifications through the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn success(&self, message: &str) {
        log::info!("✅ {}", message);
    }

    fn warn(&self, message: &str) {
        log::warn!("⚠️  {}", message);
    }
}

/// Prints notifications to the terminal and logs them
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn success(&self, message: &str) {
        println!("✅ {}", message);
        LogNotifier.success(message);
    }

    fn warn(&self, message: &str) {
        println!("⚠️  {}", message);
        LogNotifier.warn(message);
    }
}
