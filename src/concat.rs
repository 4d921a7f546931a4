use std::fs;
use std::io::Write;

use anyhow::{Context, Result};
use camino::Utf8PathBuf;

use crate::walk::{self, FileFilter, WalkedFile};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ConcatSummary {
    pub emitted: usize,
    pub failed: usize,
}

pub fn render_block(file_name: &str, content: &str) -> String {
    format!("// Start of {file_name}\n{content}\n// End of {file_name}\n\n")
}

/// Stream every matched file to `out` as a start/end delimited block.
///
/// Unreadable files are reported on `err` and skipped; only traversal and
/// output failures abort the run.
pub fn concatenate<O: Write, E: Write>(
    dirs: &[Utf8PathBuf],
    filter: &FileFilter,
    out: &mut O,
    err: &mut E,
) -> Result<ConcatSummary> {
    let mut summary = ConcatSummary::default();

    for base in dirs {
        walk::walk_files(base, filter, &mut |file: WalkedFile<'_>| {
            match fs::read_to_string(file.path) {
                Ok(content) => {
                    out.write_all(render_block(file.name, &content).as_bytes())
                        .and_then(|()| out.flush())
                        .context("writing concatenated output")?;
                    summary.emitted += 1;
                }
                Err(error) => {
                    tracing::debug!("failed to read {}: {}", file.path, error);
                    writeln!(err, "Error reading {}: {}", file.path, error)
                        .context("writing diagnostics")?;
                    summary.failed += 1;
                }
            }
            Ok(())
        })?;
    }

    tracing::info!(
        emitted = summary.emitted,
        failed = summary.failed,
        "concat run complete"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn filter(names: &[&str]) -> FileFilter {
        FileFilter::new(
            vec![".cpp".to_owned(), ".hpp".to_owned()],
            names.iter().map(|name| (*name).to_owned()).collect(),
        )
    }

    fn src_dir(tmp: &TempDir) -> Utf8PathBuf {
        let src = Utf8PathBuf::from_path_buf(tmp.path().join("src")).unwrap();
        fs::create_dir_all(&src).unwrap();
        src
    }

    fn run(dirs: &[Utf8PathBuf], filter: &FileFilter) -> (ConcatSummary, String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let summary = concatenate(dirs, filter, &mut out, &mut err).unwrap();
        (
            summary,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn render_block_wraps_content() {
        assert_eq!(
            render_block("a.cpp", "int x;"),
            "// Start of a.cpp\nint x;\n// End of a.cpp\n\n"
        );
    }

    #[test]
    fn emits_one_block_per_matched_file() {
        let tmp = TempDir::new().unwrap();
        let src = src_dir(&tmp);
        fs::write(src.join("a.cpp"), "int x;").unwrap();
        fs::write(src.join("b.hpp"), "int y;").unwrap();
        fs::write(src.join("skip.txt"), "nope").unwrap();

        let (summary, out, err) = run(&[src], &filter(&[]));

        assert_eq!(summary, ConcatSummary { emitted: 2, failed: 0 });
        assert!(err.is_empty());
        let a = "// Start of a.cpp\nint x;\n// End of a.cpp\n\n";
        let b = "// Start of b.hpp\nint y;\n// End of b.hpp\n\n";
        assert!(out == format!("{a}{b}") || out == format!("{b}{a}"), "{out}");
        assert!(!out.contains("skip.txt"));
    }

    #[test]
    fn exact_names_are_included() {
        let tmp = TempDir::new().unwrap();
        let src = src_dir(&tmp);
        fs::write(src.join("CMakeLists.txt"), "project(x)").unwrap();
        fs::write(src.join("other.txt"), "no").unwrap();

        let (summary, out, _) = run(&[src], &filter(&["CMakeLists.txt"]));

        assert_eq!(summary.emitted, 1);
        assert_eq!(
            out,
            "// Start of CMakeLists.txt\nproject(x)\n// End of CMakeLists.txt\n\n"
        );
    }

    #[test]
    fn directories_are_processed_in_the_given_order() {
        let tmp = TempDir::new().unwrap();
        let src = src_dir(&tmp);
        let include = Utf8PathBuf::from_path_buf(tmp.path().join("include")).unwrap();
        fs::create_dir_all(&include).unwrap();
        fs::write(src.join("a.cpp"), "a").unwrap();
        fs::write(include.join("a.hpp"), "h").unwrap();

        let (_, out, _) = run(&[include, src], &filter(&[]));
        let header = out.find("// Start of a.hpp").unwrap();
        let source = out.find("// Start of a.cpp").unwrap();
        assert!(header < source);
    }

    #[test]
    fn unreadable_file_is_reported_and_skipped() {
        let tmp = TempDir::new().unwrap();
        let src = src_dir(&tmp);
        fs::write(src.join("good.cpp"), "ok").unwrap();
        fs::write(src.join("bad.cpp"), [0xc3, 0x28]).unwrap();

        let (summary, out, err) = run(&[src.clone()], &filter(&[]));

        assert_eq!(summary, ConcatSummary { emitted: 1, failed: 1 });
        assert_eq!(out, "// Start of good.cpp\nok\n// End of good.cpp\n\n");
        assert_eq!(err.lines().count(), 1);
        assert!(err.starts_with(&format!("Error reading {}: ", src.join("bad.cpp"))));
    }

    #[test]
    fn missing_directories_produce_no_output() {
        let tmp = TempDir::new().unwrap();
        let absent = Utf8PathBuf::from_path_buf(tmp.path().join("absent")).unwrap();

        let (summary, out, err) = run(&[absent], &filter(&[]));
        assert_eq!(summary, ConcatSummary::default());
        assert!(out.is_empty());
        assert!(err.is_empty());
    }
}
