//! The language registry: a process-wide, read-only table of language ids,
//! display names, and grammar lookup tokens. Language attributes on code
//! blocks are free-form strings; ids missing from this table simply yield
//! no highlighting.

use std::sync::LazyLock;

use syntect::parsing::SyntaxSet;

pub const DEFAULT_LANGUAGE: &str = "javascript";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    pub id: &'static str,
    pub name: &'static str,
    /// Token passed to the grammar set lookup. Languages whose grammar is
    /// not bundled degrade to a single untyped token.
    pub grammar: &'static str,
    pub aliases: &'static [&'static str],
}

static LANGUAGES: &[Language] = &[
    Language {
        id: "javascript",
        name: "JavaScript",
        grammar: "js",
        aliases: &["js"],
    },
    Language {
        id: "typescript",
        name: "TypeScript",
        grammar: "js",
        aliases: &["ts"],
    },
    Language {
        id: "jsx",
        name: "JSX",
        grammar: "js",
        aliases: &[],
    },
    Language {
        id: "tsx",
        name: "TSX",
        grammar: "js",
        aliases: &[],
    },
    Language {
        id: "css",
        name: "CSS",
        grammar: "css",
        aliases: &[],
    },
    Language {
        id: "scss",
        name: "SCSS",
        grammar: "css",
        aliases: &["sass"],
    },
    Language {
        id: "python",
        name: "Python",
        grammar: "py",
        aliases: &["py"],
    },
    Language {
        id: "java",
        name: "Java",
        grammar: "java",
        aliases: &[],
    },
    Language {
        id: "c",
        name: "C",
        grammar: "c",
        aliases: &[],
    },
    Language {
        id: "cpp",
        name: "C++",
        grammar: "cpp",
        aliases: &["c++"],
    },
    Language {
        id: "csharp",
        name: "C#",
        grammar: "cs",
        aliases: &["cs", "c#"],
    },
    Language {
        id: "go",
        name: "Go",
        grammar: "go",
        aliases: &["golang"],
    },
    Language {
        id: "rust",
        name: "Rust",
        grammar: "rs",
        aliases: &["rs"],
    },
    Language {
        id: "json",
        name: "JSON",
        grammar: "json",
        aliases: &[],
    },
    Language {
        id: "yaml",
        name: "YAML",
        grammar: "yaml",
        aliases: &["yml"],
    },
    Language {
        id: "markdown",
        name: "Markdown",
        grammar: "md",
        aliases: &["md"],
    },
    Language {
        id: "bash",
        name: "Bash",
        grammar: "sh",
        aliases: &["sh", "shell"],
    },
    Language {
        id: "sql",
        name: "SQL",
        grammar: "sql",
        aliases: &[],
    },
    Language {
        id: "php",
        name: "PHP",
        grammar: "php",
        aliases: &[],
    },
    Language {
        id: "ruby",
        name: "Ruby",
        grammar: "rb",
        aliases: &["rb"],
    },
    Language {
        id: "swift",
        name: "Swift",
        grammar: "swift",
        aliases: &[],
    },
    Language {
        id: "plaintext",
        name: "Plain Text",
        grammar: "txt",
        aliases: &["text", "plain"],
    },
];

pub(crate) static SYNTAX_SET: LazyLock<SyntaxSet> =
    LazyLock::new(SyntaxSet::load_defaults_newlines);

pub fn languages() -> &'static [Language] {
    LANGUAGES
}

pub fn lookup(id: &str) -> Option<&'static Language> {
    let id = id.trim();
    LANGUAGES
        .iter()
        .find(|lang| lang.id.eq_ignore_ascii_case(id) || alias_matches(lang, id))
}

fn alias_matches(lang: &Language, id: &str) -> bool {
    lang.aliases.iter().any(|a| a.eq_ignore_ascii_case(id))
}

pub fn is_registered(id: &str) -> bool {
    lookup(id).is_some()
}

pub fn display_name(id: &str) -> Option<&'static str> {
    lookup(id).map(|lang| lang.name)
}
