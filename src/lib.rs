//! Venom library exports for the binary and for testing

use clap::ValueEnum;

pub mod cli;
pub mod core;
pub mod export;
pub mod scheduler;
pub mod store;
pub mod tui;

#[cfg(test)]
pub mod test_support;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// Remote document store over HTTP
    #[default]
    Http,
    /// Process-local store, nothing is persisted
    Memory,
}

impl Backend {
    pub fn as_str(self) -> &'static str {
        match self {
            Backend::Http => "http",
            Backend::Memory => "memory",
        }
    }

    /// Parses a configured backend name. Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "http" => Some(Backend::Http),
            "memory" => Some(Backend::Memory),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_names_round_trip() {
        for backend in [Backend::Http, Backend::Memory] {
            assert_eq!(Backend::from_name(backend.as_str()), Some(backend));
        }
        assert_eq!(Backend::from_name(" Memory "), Some(Backend::Memory));
        assert_eq!(Backend::from_name("couch"), None);
    }
}
