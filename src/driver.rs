//! Encode every event in a file and render the results.

use crate::config::{EmitMode, OutputConfig, OutputFormat};
use crate::errors::EventError;
use crate::event::EventFile;
use crate::mangle::{CanonicalEncoder, SubEncoder};
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// Result of encoding one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncodedSymbol {
    pub kind: String,
    pub base: String,
    pub symbol: String,
}

/// Encode all events of an already loaded file.
///
/// Each event gets its own buffer; the first failure aborts the run.
pub fn encode_events<E: SubEncoder + ?Sized>(
    file: &EventFile,
    encoder: &E,
    emit: EmitMode,
) -> Result<Vec<EncodedSymbol>, EventError> {
    file.events
        .iter()
        .enumerate()
        .map(|(index, event)| -> Result<EncodedSymbol, EventError> {
            let symbol = event
                .mangle(encoder, emit)
                .map_err(|source| EventError::Mangle {
                    index,
                    base: event.base().to_string(),
                    source,
                })?;
            Ok(EncodedSymbol {
                kind: event.kind().to_string(),
                base: event.base().to_string(),
                symbol,
            })
        })
        .collect()
}

/// Load and encode an event file with the canonical encoder.
pub fn encode_file(path: &Path, emit: EmitMode) -> Result<Vec<EncodedSymbol>, EventError> {
    let file = EventFile::load(path)?;
    let symbols = encode_events(&file, &CanonicalEncoder, emit)?;
    info!(path = %path.display(), count = symbols.len(), "encoded event file");
    Ok(symbols)
}

/// Encode an event file and discard the output, returning the event count.
pub fn check_file(path: &Path) -> Result<usize, EventError> {
    encode_file(path, EmitMode::Suffix).map(|symbols| symbols.len())
}

/// Render encoded symbols for printing.
pub fn render(symbols: &[EncodedSymbol], output: &OutputConfig) -> Result<String, EventError> {
    match output.format {
        OutputFormat::Human => {
            let mut text = String::new();
            for symbol in symbols {
                text.push_str(&symbol.symbol);
                text.push('\n');
            }
            Ok(text)
        }
        OutputFormat::Json => {
            let mut text = serde_json::to_string_pretty(symbols)?;
            text.push('\n');
            Ok(text)
        }
    }
}
