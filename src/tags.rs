/*
 * This Source Code Form is subject to the terms of the
 * Mozilla Public License, v. 2.0. If a copy of the MPL
 * was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! A small registry mapping resolved tag URIs to stable
//! integer identifiers.
//!
//! Handles and their associated prefixes (e.g. `!!` =>
//! `tag:yaml.org,2002:`) are mutated per-document by `%TAG`
//! directives -- see [`crate::event::types::TagDirectives`]
//! for that bookkeeping. This module instead answers a
//! different question: once a node's tag has been resolved
//! to an absolute URI, what stable identity does it have
//! across the lifetime of a [`TagLibrary`]? Two nodes tagged
//! `!!str` anywhere in a stream (or across streams sharing a
//! library) always resolve to the same [`TagId`].

use std::collections::HashMap;

/// A stable identifier assigned to a resolved tag URI.
///
/// IDs are assigned in registration order starting from
/// [`QUESTION_MARK`]; nothing should be inferred from the
/// numeric value of a non-reserved ID beyond equality.
pub type TagId = u32;

/// The tag of a node whose type has not yet been inferred --
/// equivalent to YAML's implicit, unresolved tag (`?`).
pub const QUESTION_MARK: TagId = 0;

/// The tag of a node explicitly marked non-specific (a bare
/// `!` with no suffix), which forces resolution based on the
/// node's kind rather than its content.
pub const EXCLAMATION_MARK: TagId = 1;

/// URIs of the YAML 1.2 core schema, pre-registered (in this
/// order, immediately after the two reserved IDs) by
/// [`TagLibrary::extended`].
pub const CORE_SCHEMA: &[&str] = &[
    "tag:yaml.org,2002:str",
    "tag:yaml.org,2002:int",
    "tag:yaml.org,2002:float",
    "tag:yaml.org,2002:bool",
    "tag:yaml.org,2002:null",
    "tag:yaml.org,2002:seq",
    "tag:yaml.org,2002:map",
    "tag:yaml.org,2002:binary",
    "tag:yaml.org,2002:timestamp",
];

const PRIMARY_HANDLE: &str = "!";
const SECONDARY_HANDLE: &str = "!!";
const SECONDARY_PREFIX: &str = "tag:yaml.org,2002:";

/// A mutable mapping from tag URIs to small integer IDs,
/// plus a mapping from active tag handles to URI prefixes.
///
/// A `TagLibrary` is typically longer lived than any single
/// [`Parser`][crate::event::Parser]: handle bindings are
/// reset at the start of every document (`%TAG` is
/// document-scoped), but registered URIs -- and therefore
/// their IDs -- persist for the library's whole lifetime,
/// which is what makes repeated resolution of `!!str` (or
/// any other URI) idempotent across documents.
#[derive(Debug, Clone)]
pub struct TagLibrary
{
    uris:       HashMap<String, TagId>,
    handles:    HashMap<String, String>,
    next_id:    TagId,
}

impl TagLibrary
{
    /// A library with the YAML 1.2 core schema
    /// (`!!str`, `!!int`, ...) pre-registered, and both
    /// default handles bound.
    pub fn extended() -> Self
    {
        let mut this = Self::basic();

        for uri in CORE_SCHEMA
        {
            this.register_uri(uri);
        }

        this
    }

    /// A library with only the two primary handles bound,
    /// and no tags registered beyond the two reserved IDs.
    pub fn basic() -> Self
    {
        let mut this = Self {
            uris:    HashMap::new(),
            handles: HashMap::new(),
            next_id: 0,
        };

        // Reserve IDs 0 and 1 for the sentinel tags so that
        // the first call to register_uri() starts at 2.
        this.next_id = 2;

        this.handles
            .insert(PRIMARY_HANDLE.to_string(), PRIMARY_HANDLE.to_string());
        this.handles
            .insert(SECONDARY_HANDLE.to_string(), SECONDARY_PREFIX.to_string());

        this
    }

    /// Look up the URI prefix a .handle currently maps to,
    /// or the empty string if the handle is unbound.
    pub fn resolve(&self, handle: &str) -> &str
    {
        self.handles.get(handle).map(String::as_str).unwrap_or("")
    }

    /// Bind a tag handle (e.g `!`, `!!`, `!local!`) to a URI
    /// prefix, overriding any prior binding. Typically driven
    /// by a `%TAG` directive.
    pub fn register_handle(&mut self, handle: &str, uri_prefix: &str)
    {
        self.handles
            .insert(handle.to_string(), uri_prefix.to_string());
    }

    /// Reset all handle bindings to the two defaults,
    /// discarding any named (`!xyz!`) handles. Called between
    /// documents, since `%TAG` directives do not carry across
    /// a `---`/`...` boundary.
    pub fn reset_handles(&mut self)
    {
        self.handles.clear();
        self.handles
            .insert(PRIMARY_HANDLE.to_string(), PRIMARY_HANDLE.to_string());
        self.handles
            .insert(SECONDARY_HANDLE.to_string(), SECONDARY_PREFIX.to_string());
    }

    /// Register a fully resolved tag URI, returning its
    /// [`TagId`]. Idempotent: registering the same URI twice
    /// returns the same ID both times.
    pub fn register_uri(&mut self, uri: &str) -> TagId
    {
        if let Some(id) = self.uris.get(uri)
        {
            return *id;
        }

        let id = self.next_id;
        self.next_id += 1;

        self.uris.insert(uri.to_string(), id);

        id
    }

    /// Look up the ID of an already registered URI without
    /// registering it, returning `None` if it is unknown.
    ///
    /// The parser itself never calls this: per the tag
    /// library contract, an unregistered URI encountered
    /// while resolving a node's tag is registered on the
    /// spot via [`register_uri`][Self::register_uri]. This
    /// is exposed for callers that want to check membership
    /// without mutating the library.
    pub fn get(&self, uri: &str) -> Option<TagId>
    {
        self.uris.get(uri).copied()
    }
}

impl Default for TagLibrary
{
    /// Equivalent to [`TagLibrary::extended`].
    fn default() -> Self
    {
        Self::extended()
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn extended_preregisters_core_schema()
    {
        let lib = TagLibrary::extended();

        for uri in CORE_SCHEMA
        {
            assert!(lib.get(uri).is_some(), "missing {}", uri);
        }
    }

    #[test]
    fn basic_has_no_core_schema()
    {
        let lib = TagLibrary::basic();

        for uri in CORE_SCHEMA
        {
            assert!(lib.get(uri).is_none());
        }
    }

    #[test]
    fn register_uri_is_idempotent()
    {
        let mut lib = TagLibrary::basic();

        let a = lib.register_uri("tag:example.com,2021:widget");
        let b = lib.register_uri("tag:example.com,2021:widget");

        assert_eq!(a, b);
    }

    #[test]
    fn distinct_uris_get_distinct_ids()
    {
        let mut lib = TagLibrary::basic();

        let a = lib.register_uri("tag:example.com,2021:widget");
        let b = lib.register_uri("tag:example.com,2021:gadget");

        assert_ne!(a, b);
    }

    #[test]
    fn reserved_ids_precede_registered_ones()
    {
        let mut lib = TagLibrary::basic();

        let id = lib.register_uri("tag:example.com,2021:widget");

        assert!(id > EXCLAMATION_MARK);
        assert!(id > QUESTION_MARK);
    }

    #[test]
    fn default_handles_resolve()
    {
        let lib = TagLibrary::basic();

        assert_eq!(lib.resolve("!"), "!");
        assert_eq!(lib.resolve("!!"), "tag:yaml.org,2002:");
        assert_eq!(lib.resolve("!bogus!"), "");
    }

    #[test]
    fn register_handle_overrides_default()
    {
        let mut lib = TagLibrary::basic();

        lib.register_handle("!!", "tag:example.com,2021:");

        assert_eq!(lib.resolve("!!"), "tag:example.com,2021:");
    }

    #[test]
    fn reset_handles_drops_named_handles()
    {
        let mut lib = TagLibrary::basic();

        lib.register_handle("!e!", "tag:example.com,2021:");
        lib.reset_handles();

        assert_eq!(lib.resolve("!e!"), "");
        assert_eq!(lib.resolve("!!"), "tag:yaml.org,2002:");
    }
}
