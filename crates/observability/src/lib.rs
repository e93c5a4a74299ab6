//! Tracing/logging setup shared by the library and the CLI.

/// Initialize process-wide logging in the given format.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init(format: LogFormat) {
    tracing::init(format);
}

/// Tracing configuration (filters, formatters).
pub mod tracing;

pub use self::tracing::LogFormat;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_accepts_either_format() {
        init(LogFormat::Json);
        init(LogFormat::Pretty);
    }
}
