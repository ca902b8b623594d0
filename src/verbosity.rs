use num_traits::PrimInt;
use tracing_subscriber::{filter::LevelFilter, EnvFilter};

/// How chatty the diagnostics on stderr are, as set by repeating `-v`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verbosity {
    None,
    Some,
    Very,
}

impl<X> From<X> for Verbosity
where
    X: PrimInt,
{
    fn from(value: X) -> Self {
        let one = X::one();
        if value < one {
            Verbosity::None
        } else if value < one + one {
            Verbosity::Some
        } else {
            Verbosity::Very
        }
    }
}

impl Verbosity {
    pub fn level(self) -> LevelFilter {
        match self {
            Verbosity::None => LevelFilter::WARN,
            Verbosity::Some => LevelFilter::INFO,
            Verbosity::Very => LevelFilter::DEBUG,
        }
    }

    /// Installs the global tracing subscriber. `RUST_LOG`, when set, takes
    /// precedence over the verbosity flags.
    pub fn init_tracing(self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::default().add_directive(self.level().into()));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .without_time()
            .with_target(false)
            .init();
    }
}
