use std::path::Path;

/// Extensions counted in the per-language statistics
const LANGUAGE_TABLE: &[(&str, &str)] = &[
    ("py", "Python"),
    ("ipynb", "Jupyter Notebook"),
    ("rs", "Rust"),
    ("js", "JavaScript"),
    ("ts", "TypeScript"),
    ("c", "C"),
    ("cpp", "C++"),
    ("h", "C/C++ Header"),
    ("java", "Java"),
    ("html", "HTML"),
    ("css", "CSS"),
    ("sh", "Shell Script"),
    ("svelte", "Svelte"),
];

/// Language name for a file, by its (case-sensitive) extension
pub fn language_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?;
    LANGUAGE_TABLE
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, lang)| *lang)
}
