//! Test: reverse-dependency queries over on-disk manifests

use crate::helpers::*;
use wolfi_ci::index::DependencyIndex;
use wolfi_ci::{get_all_image_dependencies, get_dependencies_of_packages, GeneratorConfig, GraphError};

fn repo() -> FixtureRepo {
    FixtureRepo::new()
        .with_image("observability", &["jaeger-agent", "jaeger-all-in-one"])
        .with_image("gitserver", &["git", "curl", "jaeger-agent@sourcegraph"])
        .with_image("server", &["curl", "libcurl-openssl4", "curl-dev"])
        .with_image("postgres-12", &["postgresql-12", "jaeger@otherrepo"])
        .with_file("wolfi-images/README.md", "# Base images\n")
}

#[tokio::test]
async fn test_full_index() {
    let repo = repo();
    let index = get_all_image_dependencies(repo.root(), &GeneratorConfig::default())
        .await
        .unwrap();

    assert_eq!(
        index.images().collect::<Vec<_>>(),
        vec!["gitserver", "observability", "postgres-12", "server"]
    );
    assert_eq!(
        index.packages_of("gitserver").unwrap(),
        &["git", "curl", "jaeger-agent@sourcegraph"]
    );
}

#[tokio::test]
async fn test_load_all_from_directory() {
    let repo = repo();
    let index = DependencyIndex::load_all(repo.root().join("wolfi-images"))
        .await
        .unwrap();
    assert_eq!(index.len(), 4);
}

#[tokio::test]
async fn test_multi_artifact_package() {
    let repo = repo();
    let images = get_dependencies_of_packages(repo.root(), &GeneratorConfig::default(), &["jaeger"], "")
        .await
        .unwrap();
    assert_eq!(images, vec!["observability"]);
}

#[tokio::test]
async fn test_repo_qualified_references() {
    let repo = repo();
    let config = GeneratorConfig::default();

    let images = get_dependencies_of_packages(repo.root(), &config, &["jaeger"], "sourcegraph")
        .await
        .unwrap();
    assert_eq!(images, vec!["gitserver"]);

    let images = get_dependencies_of_packages(repo.root(), &config, &["jaeger"], "otherrepo")
        .await
        .unwrap();
    assert_eq!(images, vec!["postgres-12"]);

    let images = get_dependencies_of_packages(repo.root(), &config, &["jaeger"], "nowhere")
        .await
        .unwrap();
    assert!(images.is_empty());
}

/// One image matching through several references is listed once
#[tokio::test]
async fn test_results_are_unique_and_sorted() {
    let repo = repo();
    let images = get_dependencies_of_packages(
        repo.root(),
        &GeneratorConfig::default(),
        &["curl", "git", "jaeger", "curl"],
        "",
    )
    .await
    .unwrap();

    assert_eq!(images, vec!["gitserver", "observability", "server"]);
    let mut sorted = images.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(images, sorted);
}

#[tokio::test]
async fn test_unknown_package_is_not_an_error() {
    let repo = repo();
    let images = get_dependencies_of_packages(repo.root(), &GeneratorConfig::default(), &["nginx"], "")
        .await
        .unwrap();
    assert!(images.is_empty());
}

#[tokio::test]
async fn test_malformed_manifest_aborts() {
    let repo = repo().with_file("wolfi-images/broken.yaml", "contents:\n  packages:\n    nested: map\n");

    let err = get_all_image_dependencies(repo.root(), &GeneratorConfig::default())
        .await
        .unwrap_err();
    match err {
        GraphError::Parse { path, .. } => assert!(path.ends_with("broken.yaml")),
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_images_dir_is_io_error() {
    let repo = FixtureRepo::new();
    std::fs::remove_dir(repo.root().join("wolfi-images")).unwrap();

    let err = get_dependencies_of_packages(repo.root(), &GeneratorConfig::default(), &["curl"], "")
        .await
        .unwrap_err();
    assert!(matches!(err, GraphError::Io { .. }));
}

#[tokio::test]
async fn test_custom_images_dir_and_extension() {
    let repo = FixtureRepo::new()
        .with_file("apko/server.yml", "contents:\n  packages: [curl]\n")
        .with_file("apko/ignored.yaml", "contents:\n  packages: [curl]\n");
    let config = GeneratorConfig::from_yaml("images_dir: apko\nmanifest_extension: .yml\n").unwrap();

    let images = get_dependencies_of_packages(repo.root(), &config, &["curl"], "")
        .await
        .unwrap();
    assert_eq!(images, vec!["server"]);
}
