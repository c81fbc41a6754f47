//! Terminal image support for flag previews

use ratatui_image::picker::Picker;
use ratatui_image::protocol::StatefulProtocol;

/// Graphics protocol the terminal is known to speak
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageProtocol {
    Kitty,
    Iterm2,
    None,
}

impl ImageProtocol {
    /// Guess from the environment. Querying stdio is only worth doing when this
    /// says yes, since unsupported terminals can echo the query back.
    pub fn detect() -> Self {
        let term = std::env::var("TERM").unwrap_or_default();
        let term_program = std::env::var("TERM_PROGRAM").unwrap_or_default();

        if term.contains("kitty") || term.contains("ghostty") || term_program == "ghostty" {
            ImageProtocol::Kitty
        } else if term_program == "iTerm.app" || term_program == "WezTerm" {
            ImageProtocol::Iterm2
        } else {
            ImageProtocol::None
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, ImageProtocol::None)
    }
}

/// Picker for the current terminal, if it can show images at all
pub fn detect_picker() -> Option<Picker> {
    let protocol = ImageProtocol::detect();
    if !protocol.is_supported() {
        return None;
    }
    match Picker::from_query_stdio() {
        Ok(picker) => Some(picker),
        Err(e) => {
            log::debug!("Image protocol query failed: {:?}", e);
            None
        }
    }
}

/// Decode downloaded flag bytes into a renderable protocol
pub fn decode_flag(bytes: &[u8], picker: &Picker) -> Option<StatefulProtocol> {
    match image::load_from_memory(bytes) {
        Ok(img) => Some(picker.new_resize_protocol(img)),
        Err(e) => {
            log::debug!("Could not decode flag image: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_is_unsupported() {
        assert!(!ImageProtocol::None.is_supported());
        assert!(ImageProtocol::Kitty.is_supported());
    }

    #[test]
    fn test_garbage_bytes_do_not_decode() {
        let picker = Picker::halfblocks();
        assert!(decode_flag(b"not a png", &picker).is_none());
    }
}
