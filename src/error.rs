use std::fmt;
use std::io;

/// Error type for map loading. Anything here is fatal to the attempted
/// load; tolerated problems (bad cells, duplicate spawns, missing atlas
/// images) are downgraded to warnings inside the loader instead.
#[derive(Debug)]
pub enum MapError {
    /// File I/O error.
    Io(io::Error),
    /// Malformed XML in the map document.
    Xml(quick_xml::Error),
    /// Malformed external tileset description.
    Tileset(quick_xml::DeError),
    /// The document ended inside the named element.
    Truncated(&'static str),
    /// No tile layers were found in the map.
    NoLayers,
    /// Unsupported file format (non-TMX).
    UnsupportedFormat(String),
}

impl From<io::Error> for MapError {
    fn from(err: io::Error) -> Self {
        MapError::Io(err)
    }
}

impl From<quick_xml::Error> for MapError {
    fn from(err: quick_xml::Error) -> Self {
        MapError::Xml(err)
    }
}

impl From<quick_xml::DeError> for MapError {
    fn from(err: quick_xml::DeError) -> Self {
        MapError::Tileset(err)
    }
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapError::Io(e) => write!(f, "I/O error: {}", e),
            MapError::Xml(e) => write!(f, "XML parse error: {}", e),
            MapError::Tileset(e) => write!(f, "tileset parse error: {}", e),
            MapError::Truncated(el) => write!(f, "document ended inside <{}>", el),
            MapError::NoLayers => write!(f, "no tile layers found in map"),
            MapError::UnsupportedFormat(name) => write!(f, "unsupported map format: {}", name),
        }
    }
}

impl std::error::Error for MapError {}
