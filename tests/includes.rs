//! Include expansion and configuration error tests.

use vhost_finder::nginx::{ConfigLoader, GlobExpander, ParseError};
use vhost_finder::VhostFinder;

mod common;
use common::{http_conf, ConfigTree};

fn names(finder: &VhostFinder) -> Vec<String> {
    finder
        .records()
        .iter()
        .map(|r| r.primary_name().to_string())
        .collect()
}

#[test]
fn test_includes_are_spliced_in_sorted_order() {
    let tree = ConfigTree::new();
    let sites = tree.path("sites-enabled");
    tree.write(
        "nginx.conf",
        &format!(
            "http {{\n    server {{ server_name first.test; }}\n    include {}/*;\n    server {{ server_name last.test; }}\n}}\n",
            sites.display()
        ),
    );
    tree.write("sites-enabled/20-blog", "server {\n    server_name blog.test;\n}\n");
    tree.write("sites-enabled/10-shop", "# shop\n\nserver {\n    server_name shop.test;\n}\n");

    let finder = tree.finder("nginx.conf");
    assert_eq!(
        names(&finder),
        vec!["first.test", "shop.test", "blog.test", "last.test"]
    );

    let shop = &finder.records()[1];
    let origin = shop.origin().unwrap();
    assert!(origin.file.ends_with("sites-enabled/10-shop"));
    assert_eq!(origin.line, 3);
}

#[test]
fn test_relative_include_falls_back_to_root() {
    let tree = ConfigTree::new();
    tree.write(
        "nginx.conf",
        &http_conf("    include conf.d/vhost-finder-test-*.conf;"),
    );
    tree.write(
        "conf.d/vhost-finder-test-a.conf",
        "server { listen 80; server_name a.test; }",
    );

    let finder = tree.finder("nginx.conf");
    assert_eq!(names(&finder), vec!["a.test"]);
}

#[test]
fn test_nested_includes() {
    let tree = ConfigTree::new();
    let root = tree.root().display().to_string();
    tree.write("nginx.conf", &format!("include {}/http.conf;\n", root));
    tree.write(
        "http.conf",
        &format!("http {{\n    include {}/servers/*.conf;\n}}\n", root),
    );
    tree.write(
        "servers/a.conf",
        &format!("server {{\n    include {}/snippets/name.conf;\n}}\n", root),
    );
    tree.write("snippets/name.conf", "server_name nested.test;\n");

    let finder = tree.finder("nginx.conf");
    assert_eq!(names(&finder), vec!["nested.test"]);
}

#[test]
fn test_circular_include_fails() {
    let tree = ConfigTree::new();
    let a = tree.path("a.conf");
    let b = tree.path("b.conf");
    tree.write("a.conf", &format!("http {{\ninclude {};\n}}\n", b.display()));
    tree.write("b.conf", &format!("include {};\n", a.display()));

    let err = VhostFinder::load(&a, &tree.loader()).unwrap_err();
    match err {
        ParseError::CircularInclude { at, chain } => {
            assert!(at.file.ends_with("b.conf"));
            assert_eq!(at.line, 1);
            assert_eq!(chain.len(), 3);
            assert!(chain[0].ends_with("a.conf"));
            assert!(chain[2].ends_with("a.conf"));
        }
        other => panic!("expected circular include, got {other}"),
    }
}

#[test]
fn test_self_include_fails() {
    let tree = ConfigTree::new();
    let a = tree.path("a.conf");
    tree.write("a.conf", &format!("include {};\n", a.display()));

    let err = VhostFinder::load(&a, &tree.loader()).unwrap_err();
    assert!(matches!(err, ParseError::CircularInclude { .. }));
}

#[test]
fn test_same_file_twice_is_not_a_cycle() {
    let tree = ConfigTree::new();
    let snippet = tree.path("name.conf");
    tree.write("name.conf", "server_name twice.test;\n");
    tree.write(
        "nginx.conf",
        &format!(
            "http {{\nserver {{\ninclude {0};\n}}\nserver {{\nlisten 8080;\ninclude {0};\n}}\n}}\n",
            snippet.display()
        ),
    );

    let finder = tree.finder("nginx.conf");
    assert_eq!(names(&finder), vec!["twice.test", "twice.test"]);
}

#[test]
fn test_include_depth_limit() {
    let tree = ConfigTree::new();
    for i in 0..5 {
        let next = tree.path(&format!("level{}.conf", i + 1));
        tree.write(&format!("level{}.conf", i), &format!("include {};\n", next.display()));
    }
    tree.write("level5.conf", "http { }\n");

    let loader = ConfigLoader::new(GlobExpander::new(tree.root())).with_max_depth(3);
    let err = VhostFinder::load(&tree.path("level0.conf"), &loader).unwrap_err();
    assert!(matches!(err, ParseError::IncludeDepthExceeded { limit: 3, .. }));

    let loader = ConfigLoader::new(GlobExpander::new(tree.root())).with_max_depth(5);
    assert!(VhostFinder::load(&tree.path("level0.conf"), &loader).is_ok());
}

#[test]
fn test_missing_root_file() {
    let tree = ConfigTree::new();
    let err = VhostFinder::load(&tree.path("absent.conf"), &tree.loader()).unwrap_err();
    assert!(matches!(err, ParseError::ConfigNotFound { .. }));
    assert!(err.to_string().contains("absent.conf"));
}

#[test]
fn test_unbalanced_braces() {
    let tree = ConfigTree::new();
    tree.write("nginx.conf", "http {\n    server {\n        listen 80;\n    }\n");

    let err = VhostFinder::load(&tree.path("nginx.conf"), &tree.loader()).unwrap_err();
    match err {
        ParseError::MalformedConfig { at, .. } => {
            assert!(at.file.ends_with("nginx.conf"));
            assert_eq!(at.line, 1);
        }
        other => panic!("expected malformed config, got {other}"),
    }
}

#[test]
fn test_missing_http_block() {
    let tree = ConfigTree::new();
    tree.write("nginx.conf", "server {\n    listen 80;\n}\n");

    let err = VhostFinder::load(&tree.path("nginx.conf"), &tree.loader()).unwrap_err();
    assert!(matches!(err, ParseError::MissingHttpBlock { .. }));
}

#[test]
fn test_unmatched_include_is_skipped() {
    let tree = ConfigTree::new();
    tree.write(
        "nginx.conf",
        &http_conf("    include does-not-exist/*.conf;\n    server { server_name only.test; }"),
    );

    let finder = tree.finder("nginx.conf");
    assert_eq!(names(&finder), vec!["only.test"]);
}

#[test]
fn test_several_includes_on_one_line() {
    let tree = ConfigTree::new();
    let a = tree.write("sites/a.conf", "server { listen 80; server_name a.test; }\n");
    let b = tree.write("sites/b.conf", "server { listen 80; server_name b.test; }\n");
    tree.write(
        "nginx.conf",
        &format!("http {{\n    include {}; include {};\n}}\n", a.display(), b.display()),
    );

    let finder = tree.finder("nginx.conf");
    assert_eq!(names(&finder), vec!["a.test", "b.test"]);
}

#[test]
fn test_include_inside_server_opening_line() {
    let tree = ConfigTree::new();
    let snippet = tree.write("snippets/name.conf", "server_name inline.test;\n");
    tree.write(
        "nginx.conf",
        &format!("http {{\n    server {{ include {};\n    }}\n}}\n", snippet.display()),
    );

    let finder = tree.finder("nginx.conf");
    assert_eq!(names(&finder), vec!["inline.test"]);
}
