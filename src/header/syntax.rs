use indexmap::IndexMap;
use std::path::Path;

/// A block comment delimiter pair, e.g. `/*` ... `*/`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockDelimiters {
    pub open: &'static str,
    pub close: &'static str,
    /// Leading marker repeated on inner lines (`*` in C-style blocks)
    pub continuation: Option<char>,
}

/// Comment syntax of one source language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentSyntax {
    pub language: &'static str,
    /// Line comment prefixes, longest first
    pub line_prefixes: &'static [&'static str],
    pub blocks: &'static [BlockDelimiters],
    pub allows_shebang: bool,
}

const C_BLOCK: BlockDelimiters = BlockDelimiters { open: "/*", close: "*/", continuation: Some('*') };
const HTML_BLOCK: BlockDelimiters = BlockDelimiters { open: "<!--", close: "-->", continuation: None };
const PY_DOUBLE: BlockDelimiters = BlockDelimiters { open: "\"\"\"", close: "\"\"\"", continuation: None };
const PY_SINGLE: BlockDelimiters = BlockDelimiters { open: "'''", close: "'''", continuation: None };
const LUA_BLOCK: BlockDelimiters = BlockDelimiters { open: "--[[", close: "]]", continuation: None };

const SLASH_PREFIXES: &[&str] = &["///", "//"];
const POUND_PREFIXES: &[&str] = &["#"];

/// Registered comment syntaxes. Adding a language is a new row here.
static SYNTAXES: &[CommentSyntax] = &[
    CommentSyntax { language: "c", line_prefixes: SLASH_PREFIXES, blocks: &[C_BLOCK], allows_shebang: false },
    CommentSyntax { language: "cpp", line_prefixes: SLASH_PREFIXES, blocks: &[C_BLOCK], allows_shebang: false },
    CommentSyntax { language: "objc", line_prefixes: SLASH_PREFIXES, blocks: &[C_BLOCK], allows_shebang: false },
    CommentSyntax { language: "java", line_prefixes: SLASH_PREFIXES, blocks: &[C_BLOCK], allows_shebang: false },
    CommentSyntax { language: "kotlin", line_prefixes: SLASH_PREFIXES, blocks: &[C_BLOCK], allows_shebang: true },
    CommentSyntax { language: "groovy", line_prefixes: SLASH_PREFIXES, blocks: &[C_BLOCK], allows_shebang: true },
    CommentSyntax { language: "swift", line_prefixes: SLASH_PREFIXES, blocks: &[C_BLOCK], allows_shebang: true },
    CommentSyntax { language: "go", line_prefixes: SLASH_PREFIXES, blocks: &[C_BLOCK], allows_shebang: false },
    CommentSyntax { language: "rust", line_prefixes: &["//!", "///", "//"], blocks: &[C_BLOCK], allows_shebang: true },
    CommentSyntax { language: "javascript", line_prefixes: SLASH_PREFIXES, blocks: &[C_BLOCK], allows_shebang: true },
    CommentSyntax { language: "typescript", line_prefixes: SLASH_PREFIXES, blocks: &[C_BLOCK], allows_shebang: true },
    CommentSyntax { language: "dart", line_prefixes: SLASH_PREFIXES, blocks: &[C_BLOCK], allows_shebang: true },
    CommentSyntax { language: "css", line_prefixes: &[], blocks: &[C_BLOCK], allows_shebang: false },
    CommentSyntax { language: "python", line_prefixes: POUND_PREFIXES, blocks: &[PY_DOUBLE, PY_SINGLE], allows_shebang: true },
    CommentSyntax { language: "shell", line_prefixes: POUND_PREFIXES, blocks: &[], allows_shebang: true },
    CommentSyntax { language: "ruby", line_prefixes: POUND_PREFIXES, blocks: &[], allows_shebang: true },
    CommentSyntax { language: "perl", line_prefixes: POUND_PREFIXES, blocks: &[], allows_shebang: true },
    CommentSyntax { language: "gn", line_prefixes: POUND_PREFIXES, blocks: &[], allows_shebang: false },
    CommentSyntax { language: "cmake", line_prefixes: POUND_PREFIXES, blocks: &[], allows_shebang: false },
    CommentSyntax { language: "yaml", line_prefixes: POUND_PREFIXES, blocks: &[], allows_shebang: false },
    CommentSyntax { language: "toml", line_prefixes: POUND_PREFIXES, blocks: &[], allows_shebang: false },
    CommentSyntax { language: "lua", line_prefixes: &["--"], blocks: &[LUA_BLOCK], allows_shebang: true },
    CommentSyntax { language: "sql", line_prefixes: &["--"], blocks: &[C_BLOCK], allows_shebang: false },
    CommentSyntax { language: "html", line_prefixes: &[], blocks: &[HTML_BLOCK], allows_shebang: false },
];

/// File extension (or exact file name) to language tag
static EXTENSIONS: &[(&str, &str)] = &[
    ("h", "cpp"),
    ("cc", "cpp"),
    ("cpp", "cpp"),
    ("cxx", "cpp"),
    ("hpp", "cpp"),
    ("c", "c"),
    ("m", "objc"),
    ("mm", "objc"),
    ("java", "java"),
    ("kt", "kotlin"),
    ("kts", "kotlin"),
    ("gradle", "groovy"),
    ("groovy", "groovy"),
    ("swift", "swift"),
    ("go", "go"),
    ("rs", "rust"),
    ("js", "javascript"),
    ("mjs", "javascript"),
    ("jsx", "javascript"),
    ("ts", "typescript"),
    ("tsx", "typescript"),
    ("dart", "dart"),
    ("css", "css"),
    ("scss", "css"),
    ("less", "css"),
    ("py", "python"),
    ("sh", "shell"),
    ("bash", "shell"),
    ("zsh", "shell"),
    ("rb", "ruby"),
    ("pl", "perl"),
    ("gn", "gn"),
    ("gni", "gn"),
    ("cmake", "cmake"),
    ("CMakeLists.txt", "cmake"),
    ("yml", "yaml"),
    ("yaml", "yaml"),
    ("toml", "toml"),
    ("lua", "lua"),
    ("sql", "sql"),
    ("html", "html"),
    ("htm", "html"),
    ("xml", "html"),
];

/// Look up the comment syntax registered for a language tag
pub fn syntax_for(language: &str) -> Option<&'static CommentSyntax> {
    SYNTAXES.iter().find(|syntax| syntax.language.eq_ignore_ascii_case(language))
}

/// All registered language tags, in table order
pub fn supported_languages() -> impl Iterator<Item = &'static str> {
    SYNTAXES.iter().map(|syntax| syntax.language)
}

/// Detect the language tag of a file from its name.
///
/// `overrides` maps an extension (without the dot) or a full file name to a
/// language tag and takes precedence over the built-in table. The returned tag
/// is not guaranteed to have a registered syntax; that is for the extractor to
/// decide.
pub fn detect_language(path: &Path, overrides: &IndexMap<String, String>) -> Option<String> {
    let file_name = path.file_name()?.to_string_lossy();
    let extension = path.extension().map(|ext| ext.to_string_lossy().to_string());

    // File name wins over extension, overrides win over the table
    if let Some(language) = overrides.get(file_name.as_ref()) {
        return Some(language.clone());
    }
    if let Some(language) = extension.as_ref().and_then(|ext| overrides.get(ext)) {
        return Some(language.clone());
    }

    if let Some((_, language)) = EXTENSIONS.iter().find(|(key, _)| *key == file_name.as_ref()) {
        return Some(language.to_string());
    }
    let extension = extension?;
    EXTENSIONS
        .iter()
        .find(|(key, _)| *key == extension)
        .map(|(_, language)| language.to_string())
}
