//! Converters backed by external programs.
//!
//! Each converter locates its program through a [`ToolResolver`] at
//! conversion time, so a missing tool only fails documents of its format.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::tools::{ToolResolver, run_piped};
use crate::{ConversionInput, ConvertedMarkup, MarkupConverter, MarkupError};

const RST2HTML: &[&str] = &["rst2html", "rst2html.py"];
const PYTHON: &[&str] = &["python", "py", "python.exe", "python3", "python3.exe", "py3"];
const RST_ARGS: &[&str] = &[
    "--quiet",
    "--halt=5",
    "--report=5",
    "--link-stylesheet",
    "--no-file-insertion",
    "--no-toc-backlinks",
    "--no-footnote-backlinks",
    "--no-section-numbering",
];

const ASCIIDOCTOR: &[&str] = &["asciidoctor"];
const ADOC_ARGS: &[&str] = &["-s", "--quiet", "--safe-mode", "secure", "-"];

const XSLTPROC: &[&str] = &["xsltproc", "xsltproc.exe"];
const XSLT_ARGS: &[&str] = &[
    "--stringparam",
    "use.extensions",
    "0",
    "--stringparam",
    "generate.toc",
    "nop",
];

const DITA: &[&str] = &["dita", "dita.bat"];

static SPHINX_GLOSSARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.\. glossary::").expect("Invalid glossary regex"));

static SPHINX_CODE_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\.\. (?:raw|code(?:-block)?):: (\w+)").expect("Invalid code block regex")
});

fn file_stem(path: &Path) -> Result<String, MarkupError> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .ok_or_else(|| MarkupError::filesystem(format!("{} has no file name", path.display())))
}

/// reStructuredText converter using docutils' `rst2html`.
#[derive(Debug, Clone)]
pub struct RstConverter {
    resolver: ToolResolver,
    sphinx_build_dir: Option<PathBuf>,
}

impl RstConverter {
    /// Creates a converter; `sphinx_build_dir` switches to prebuilt output.
    pub fn new(resolver: ToolResolver, sphinx_build_dir: Option<PathBuf>) -> Self {
        Self {
            resolver,
            sphinx_build_dir,
        }
    }

    fn read_sphinx_page(&self, dir: &Path, path: &Path) -> Result<ConvertedMarkup, MarkupError> {
        let built = dir.join("html").join(format!("{}.html", file_stem(path)?));
        debug!("Reading prebuilt Sphinx page {}", built.display());

        fs::read(&built)
            .map(ConvertedMarkup::new)
            .map_err(|e| MarkupError::filesystem(format!("{}: {}", built.display(), e)))
    }
}

impl MarkupConverter for RstConverter {
    fn name(&self) -> &str {
        "rst2html"
    }

    fn convert(&self, input: &ConversionInput<'_>) -> Result<ConvertedMarkup, MarkupError> {
        let (Some(rst2html), Some(python)) =
            (self.resolver.which(RST2HTML), self.resolver.which(PYTHON))
        else {
            return Err(MarkupError::tool_missing("rst2html"));
        };

        if let Some(dir) = &self.sphinx_build_dir {
            return self.read_sphinx_page(dir, input.path);
        }

        let source = SPHINX_GLOSSARY.replace_all(input.content, ".. code::");
        let source = SPHINX_CODE_BLOCK.replace_all(&source, "::");

        let output = if cfg!(windows) {
            let mut args = vec![rst2html.to_string_lossy().into_owned()];
            args.extend(RST_ARGS.iter().map(|arg| arg.to_string()));
            run_piped(self.name(), &python, args, Some(&*source))?
        } else {
            run_piped(self.name(), &rst2html, RST_ARGS, Some(&*source))?
        };

        let html: Vec<u8> = output.into_iter().filter(|&b| b != b'\r').collect();
        Ok(ConvertedMarkup::new(extract_body(&html)))
    }
}

/// Returns the region between `<body>\n` and `\n</body>`.
///
/// A missing start marker starts at the beginning of the output and a
/// missing end marker runs to its end.
pub fn extract_body(html: &[u8]) -> &[u8] {
    const OPEN: &[u8] = b"<body>\n";
    const CLOSE: &[u8] = b"\n</body>";

    let start = find(html, OPEN).map_or(0, |i| i + OPEN.len());
    let end = find(html, CLOSE).unwrap_or(html.len()).max(start);
    &html[start..end]
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// AsciiDoc converter using `asciidoctor`.
#[derive(Debug, Clone)]
pub struct AsciiDocConverter {
    resolver: ToolResolver,
}

impl AsciiDocConverter {
    pub fn new(resolver: ToolResolver) -> Self {
        Self { resolver }
    }
}

impl MarkupConverter for AsciiDocConverter {
    fn name(&self) -> &str {
        "asciidoctor"
    }

    fn convert(&self, input: &ConversionInput<'_>) -> Result<ConvertedMarkup, MarkupError> {
        let program = self
            .resolver
            .which(ASCIIDOCTOR)
            .ok_or_else(|| MarkupError::tool_missing(self.name()))?;

        let output = run_piped(self.name(), &program, ADOC_ARGS, Some(input.content))?;
        let html = normalize_apostrophes(&String::from_utf8_lossy(&output));
        Ok(ConvertedMarkup::new(html))
    }
}

/// Replaces typographic apostrophes emitted by Asciidoctor with `&apos;`.
pub fn normalize_apostrophes(html: &str) -> String {
    ["\u{2018}", "\u{2019}", "&#8217;", "&rsquo;"]
        .iter()
        .fold(html.to_string(), |acc, from| acc.replace(from, "&apos;"))
}

/// XML converter applying an XSLT sheet with `xsltproc`.
#[derive(Debug, Clone)]
pub struct XsltConverter {
    resolver: ToolResolver,
    transform: Option<PathBuf>,
}

impl XsltConverter {
    pub fn new(resolver: ToolResolver, transform: Option<PathBuf>) -> Self {
        Self {
            resolver,
            transform,
        }
    }
}

impl MarkupConverter for XsltConverter {
    fn name(&self) -> &str {
        "xsltproc"
    }

    fn convert(&self, input: &ConversionInput<'_>) -> Result<ConvertedMarkup, MarkupError> {
        let program = self
            .resolver
            .which(XSLTPROC)
            .ok_or_else(|| MarkupError::tool_missing(self.name()))?;
        let transform = self
            .transform
            .as_ref()
            .ok_or(MarkupError::MissingTransform)?;

        let mut args: Vec<&OsStr> = XSLT_ARGS.iter().map(OsStr::new).collect();
        args.push(transform.as_os_str());
        args.push(OsStr::new("-"));

        run_piped(self.name(), &program, args, Some(input.content)).map(ConvertedMarkup::new)
    }
}

/// DITA converter using the DITA Open Toolkit.
///
/// The toolkit reads the document from disk and writes an HTML5 page into a
/// temporary output directory, which is removed once the page is read.
#[derive(Debug, Clone)]
pub struct DitaConverter {
    resolver: ToolResolver,
}

impl DitaConverter {
    pub fn new(resolver: ToolResolver) -> Self {
        Self { resolver }
    }
}

impl MarkupConverter for DitaConverter {
    fn name(&self) -> &str {
        "dita"
    }

    fn convert(&self, input: &ConversionInput<'_>) -> Result<ConvertedMarkup, MarkupError> {
        let program = self
            .resolver
            .which(DITA)
            .ok_or_else(|| MarkupError::tool_missing(self.name()))?;

        let out_dir = tempfile::Builder::new()
            .prefix("dita-")
            .tempdir()
            .map_err(|e| MarkupError::filesystem(e.to_string()))?;

        let args = [
            OsStr::new("-i"),
            input.path.as_os_str(),
            OsStr::new("-f"),
            OsStr::new("html5"),
            OsStr::new("-o"),
            out_dir.path().as_os_str(),
            OsStr::new("--nav-toc=none"),
        ];
        run_piped(self.name(), &program, args, None)?;

        let page = out_dir
            .path()
            .join(format!("{}.html", file_stem(input.path)?));
        let html = fs::read(&page)
            .map_err(|e| MarkupError::filesystem(format!("{}: {}", page.display(), e)))?;

        Ok(ConvertedMarkup::new(strip_head(&html)))
    }
}

/// Removes the `<head>...</head>` region, markers included.
///
/// Output without both markers is returned unchanged.
pub fn strip_head(html: &[u8]) -> Vec<u8> {
    const CLOSE: &[u8] = b"</head>";

    match (find(html, b"<head>"), find(html, CLOSE)) {
        (Some(start), Some(end)) if start <= end => {
            let mut out = html[..start].to_vec();
            out.extend_from_slice(&html[end + CLOSE.len()..]);
            out
        }
        _ => html.to_vec(),
    }
}
