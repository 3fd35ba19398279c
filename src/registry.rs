//! Recognized pass-through ("porter") node types.
//!
//! Porter nodes connect two points in a graph by a shared broadcast name
//! instead of a literal link: a *setter* publishes a value under its title's
//! name and every *getter* with the same name receives it. The dependency
//! analyzer treats a matched setter/getter pair as a virtual edge, and the
//! subgraph extractor synthesizes porter pairs to carry connections across
//! the inlining boundary.
//!
//! Which node types play these roles is editor configuration, not an engine
//! assumption, so the registry is injectable and customized builder-style.

/// Glyph prefixed to a synthesized setter title.
pub const SETTER_GLYPH: &str = "\u{27a1}\u{fe0f}"; // ➡️
/// Glyph prefixed to a synthesized getter title.
pub const GETTER_GLYPH: &str = "\u{2b05}\u{fe0f}"; // ⬅️

/// Glyphs stripped when resolving a porter title to its broadcast name.
/// Both emoji-presentation and plain forms appear in documents in the wild.
const DIRECTION_GLYPHS: [&str; 5] = [
    "\u{27a1}\u{fe0f}",
    "\u{2b05}\u{fe0f}",
    "\u{27a1}",
    "\u{2b05}",
    "\u{fe0f}",
];

/// The injectable set of setter/getter node type names.
#[derive(Debug, Clone)]
pub struct PorterRegistry {
    setter_types: Vec<String>,
    getter_types: Vec<String>,
}

impl Default for PorterRegistry {
    fn default() -> Self {
        Self {
            setter_types: vec!["SetNode".to_string()],
            getter_types: vec!["GetNode".to_string()],
        }
    }
}

impl PorterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an additional node type recognized as a setter.
    pub fn with_setter_type(mut self, type_name: &str) -> Self {
        self.setter_types.push(type_name.to_string());
        self
    }

    /// Registers an additional node type recognized as a getter.
    pub fn with_getter_type(mut self, type_name: &str) -> Self {
        self.getter_types.push(type_name.to_string());
        self
    }

    pub fn is_setter(&self, node_type: &str) -> bool {
        self.setter_types.iter().any(|t| t == node_type)
    }

    pub fn is_getter(&self, node_type: &str) -> bool {
        self.getter_types.iter().any(|t| t == node_type)
    }

    /// The node type used when the extractor synthesizes a setter.
    pub fn setter_type(&self) -> &str {
        &self.setter_types[0]
    }

    /// The node type used when the extractor synthesizes a getter.
    pub fn getter_type(&self) -> &str {
        &self.getter_types[0]
    }

    /// Resolves the broadcast name carried by a porter node title: direction
    /// glyphs are stripped and surrounding whitespace trimmed; matching is
    /// exact on the remainder.
    ///
    /// This string-based coupling is deliberately confined to this one
    /// function so the matching rule can be hardened without touching any
    /// graph traversal code.
    pub fn broadcast_name(&self, title: &str) -> String {
        let mut name = title.to_string();
        for glyph in DIRECTION_GLYPHS {
            name = name.replace(glyph, "");
        }
        name.trim().to_string()
    }
}
