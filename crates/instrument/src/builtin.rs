// standard library
use std::sync::OnceLock;

// internal modules
use crate::config::InstrumentConfig;
use crate::error::{Error, Result};

/// Names of the instruments shipped with the crate
pub const BUILTIN_INSTRUMENTS: [&str; 2] = ["let", "merlin"];

/// Load one of the built-in instrument definitions by name
///
/// Names are case-insensitive. The definitions are parsed once on first use
/// and cloned for every caller, so each caller owns an independent copy.
///
/// ```rust
/// # use tofchop_instrument::load_builtin;
/// let merlin = load_builtin("MERLIN").unwrap();
/// assert_eq!(merlin.choppers.len(), 2);
/// ```
pub fn load_builtin(name: &str) -> Result<InstrumentConfig> {
    let config = match name.to_lowercase().as_str() {
        "let" => load_let(),
        "merlin" => load_merlin(),
        _ => {
            return Err(Error::UnknownInstrument {
                name: name.to_string(),
                available: BUILTIN_INSTRUMENTS.iter().map(|s| s.to_string()).collect(),
            })
        }
    };

    // a broken embedded definition is reported, not swallowed
    config.as_ref().cloned().map_err(|reason| Error::InvalidConfig {
        field: name.to_string(),
        reason: reason.clone(),
    })
}

// Only ever parse the embedded definitions once, no sense doing it every time
static LET: OnceLock<core::result::Result<InstrumentConfig, String>> = OnceLock::new();
static MERLIN: OnceLock<core::result::Result<InstrumentConfig, String>> = OnceLock::new();

fn load_let() -> &'static core::result::Result<InstrumentConfig, String> {
    LET.get_or_init(|| {
        InstrumentConfig::from_json_str(include_str!("../data/let.json")).map_err(|e| e.to_string())
    })
}

fn load_merlin() -> &'static core::result::Result<InstrumentConfig, String> {
    MERLIN.get_or_init(|| {
        InstrumentConfig::from_json_str(include_str!("../data/merlin.json"))
            .map_err(|e| e.to_string())
    })
}
