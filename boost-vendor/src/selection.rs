//! The vendored subset of Boost, as a declarative table.
//!
//! Each record names either a module directory under `boost/` or a single
//! header sitting directly in `boost/`. Together they form the hand-maintained
//! dependency closure of `boost/signals2`. Nothing checks that closure against
//! upstream metadata; when the pinned release changes, the table has to be
//! reviewed by compiling the host project.

use std::fmt;

/// Modules whose umbrella header is never copied alongside the directory.
///
/// Some have no umbrella header upstream; for the rest the header is either
/// unused or listed explicitly as its own record.
pub const UMBRELLA_EXEMPT: &[&str] = &[
    "core",
    "mpl",
    "predef",
    "tuple",
    "exception",
    "detail",
    "move",
    "container_hash",
];

/// Suffix of a module's umbrella header.
pub const HEADER_SUFFIX: &str = ".hpp";

/// What a selection record copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// A whole module directory, plus its umbrella header unless exempt.
    Module,
    /// One header file from the module root.
    Header,
}

/// One record of the selection table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SelectionEntry {
    name: &'static str,
    kind: EntryKind,
}

impl SelectionEntry {
    /// A module directory record.
    #[must_use]
    pub const fn module(name: &'static str) -> Self {
        Self {
            name,
            kind: EntryKind::Module,
        }
    }

    /// A single header record; `name` includes the `.hpp` suffix.
    #[must_use]
    pub const fn header(name: &'static str) -> Self {
        Self {
            name,
            kind: EntryKind::Header,
        }
    }

    /// The module directory or header file name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Whether this record copies a directory or a single header.
    #[must_use]
    pub const fn kind(&self) -> EntryKind {
        self.kind
    }

    /// The umbrella header copied with this record, if any.
    ///
    /// Always `None` for header records and for exempt modules.
    #[must_use]
    pub fn umbrella_header(&self) -> Option<String> {
        match self.kind {
            EntryKind::Module if !is_umbrella_exempt(self.name) => {
                Some(umbrella_header_name(self.name))
            }
            EntryKind::Module | EntryKind::Header => None,
        }
    }
}

impl fmt::Display for SelectionEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            EntryKind::Module => write!(f, "module {}", self.name),
            EntryKind::Header => write!(f, "header {}", self.name),
        }
    }
}

/// Return whether `module` is in [`UMBRELLA_EXEMPT`].
#[must_use]
pub fn is_umbrella_exempt(module: &str) -> bool {
    UMBRELLA_EXEMPT.contains(&module)
}

/// Return the umbrella header file name for `module`.
#[must_use]
pub fn umbrella_header_name(module: &str) -> String {
    format!("{module}{HEADER_SUFFIX}")
}

/// Everything `boost/signals2` needs to compile, in review order.
pub const SIGNALS2_CLOSURE: &[SelectionEntry] = &[
    SelectionEntry::module("signals2"),
    // signals2 dependencies
    SelectionEntry::module("assert"),
    SelectionEntry::module("bind"),
    SelectionEntry::module("config"),
    SelectionEntry::module("core"),
    SelectionEntry::module("function"),
    SelectionEntry::module("iterator"),
    SelectionEntry::module("mpl"),
    SelectionEntry::module("optional"),
    SelectionEntry::module("parameter"),
    SelectionEntry::module("predef"),
    // Also required by the Windows configuration headers.
    SelectionEntry::module("preprocessor"),
    SelectionEntry::module("smart_ptr"),
    SelectionEntry::header("throw_exception.hpp"),
    SelectionEntry::module("tuple"),
    SelectionEntry::module("type_traits"),
    SelectionEntry::module("variant"),
    SelectionEntry::header("shared_ptr.hpp"),
    SelectionEntry::header("cstdint.hpp"),
    SelectionEntry::module("exception"),
    SelectionEntry::header("version.hpp"),
    SelectionEntry::module("detail"),
    SelectionEntry::header("static_assert.hpp"),
    SelectionEntry::module("move"),
    SelectionEntry::header("type.hpp"),
    SelectionEntry::header("none.hpp"),
    SelectionEntry::header("none_t.hpp"),
    SelectionEntry::module("utility"),
    SelectionEntry::header("function_equal.hpp"),
    SelectionEntry::header("mem_fn.hpp"),
    SelectionEntry::header("get_pointer.hpp"),
    SelectionEntry::header("is_placeholder.hpp"),
    SelectionEntry::header("visit_each.hpp"),
    SelectionEntry::header("weak_ptr.hpp"),
    SelectionEntry::header("scoped_ptr.hpp"),
    SelectionEntry::header("blank_fwd.hpp"),
    SelectionEntry::module("type_index"),
    SelectionEntry::module("container_hash"),
    SelectionEntry::header("call_traits.hpp"),
    SelectionEntry::module("functional"),
    SelectionEntry::header("blank.hpp"),
    SelectionEntry::module("integer"),
    SelectionEntry::header("integer_fwd.hpp"),
    SelectionEntry::header("limits.hpp"),
    SelectionEntry::module("mp11"),
];
