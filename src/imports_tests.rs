#[cfg(test)]
mod tests {
    use crate::error::ScopeError;
    use crate::imports::{inline_imports, resolve_import};
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_resolve_strips_leading_dot_slash() {
        let base = Path::new("/project/src/styles");
        assert_eq!(
            resolve_import("./theme.scss", base),
            PathBuf::from("/project/src/styles/theme.scss")
        );
        assert_eq!(
            resolve_import("theme.scss", base),
            PathBuf::from("/project/src/styles/theme.scss")
        );
        assert_eq!(
            resolve_import("../shared/a.css", base),
            PathBuf::from("/project/src/styles/../shared/a.css")
        );
    }

    #[test]
    fn test_inlines_partial_without_extension() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "_vars.scss", ".base { margin: 0; }");
        let main = write(
            dir.path(),
            "main.scss",
            "@import \"./vars\";\n.title { color: red; }",
        );

        assert_eq!(
            inline_imports(&main).unwrap(),
            ".base { margin: 0; }\n.title { color: red; }"
        );
    }

    #[test]
    fn test_nested_imports_resolve_from_importing_file() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "parts/inner.css", ".inner {}");
        write(dir.path(), "parts/outer.css", "@import 'inner.css';\n.outer {}");
        let main = write(dir.path(), "main.css", "@import url(parts/outer.css);");

        assert_eq!(inline_imports(&main).unwrap(), ".inner {}\n.outer {}");
    }

    #[test]
    fn test_shared_import_is_inlined_once() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "common.css", ".common {}");
        write(dir.path(), "a.css", "@import \"common.css\";\n.a {}");
        write(dir.path(), "b.css", "@import \"common.css\";\n.b {}");
        let main = write(dir.path(), "main.css", "@import \"a.css\", \"b.css\";");

        let css = inline_imports(&main).unwrap();
        assert_eq!(css.matches(".common").count(), 1);
        assert!(css.contains(".a {}"));
        assert!(css.contains(".b {}"));
    }

    #[test]
    fn test_import_cycle_is_an_error() {
        let dir = TempDir::new().unwrap();
        let a = write(dir.path(), "a.css", "@import \"b.css\";\n.a {}");
        write(dir.path(), "b.css", "@import \"a.css\";\n.b {}");

        match inline_imports(&a) {
            Err(ScopeError::ImportCycle(chain)) => assert_eq!(chain.len(), 3),
            other => panic!("expected import cycle, got {:?}", other),
        }
    }

    #[test]
    fn test_remote_imports_are_kept() {
        let dir = TempDir::new().unwrap();
        let source = "@import url(https://fonts.example.com/css?family=Inter);\n.title {}";
        let main = write(dir.path(), "main.css", source);
        assert_eq!(inline_imports(&main).unwrap(), source);
    }

    #[test]
    fn test_media_query_wraps_import() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "print.css", ".page {}");
        let main = write(dir.path(), "main.css", "@import \"print.css\" print;");
        assert_eq!(
            inline_imports(&main).unwrap(),
            "@media print {\n.page {}\n}"
        );
    }

    #[test]
    fn test_missing_import_reports_path() {
        let dir = TempDir::new().unwrap();
        let main = write(dir.path(), "main.css", "@import \"nowhere.css\";");
        match inline_imports(&main) {
            Err(ScopeError::Io { path, .. }) => assert!(path.ends_with("nowhere.css")),
            other => panic!("expected io error, got {:?}", other),
        }
    }
}
