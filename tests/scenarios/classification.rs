//! Test: changed-path classification asymmetry between packages and images

use wolfi_ci::{ChangeClassifier, ChangeKind, ChangeSet, GenerateOptions, GraphError, PipelineGenerator};

#[test]
fn test_bad_image_name_is_fatal() {
    let changes = ChangeSet::from_lines("wolfi-packages/curl.yaml\nwolfi-images/bad name.yaml\n");
    let err = PipelineGenerator::default()
        .generate(&changes, &GenerateOptions::new("main", "t"))
        .unwrap_err();

    match err {
        GraphError::Classification { path, .. } => assert_eq!(path, "wolfi-images/bad name.yaml"),
        other => panic!("expected classification error, got {:?}", other),
    }
}

#[test]
fn test_bad_package_name_is_dropped() {
    let changes = ChangeSet::from_lines("wolfi-packages/bad name.yaml\nwolfi-packages/curl.yaml\n");
    let generation = PipelineGenerator::default()
        .generate(&changes, &GenerateOptions::new("main", "t"))
        .unwrap();

    assert_eq!(generation.changed_packages, vec!["curl"]);
    assert_eq!(generation.package_count, 1);
}

#[test]
fn test_stray_files_in_packages_tree_are_dropped() {
    let classifier = ChangeClassifier::default();
    let paths = [
        "wolfi-packages/README.md",
        "wolfi-packages/patches/fix.patch",
        "wolfi-packages/curl.yaml",
    ];
    assert_eq!(classifier.classify_package_changes(&paths), vec!["curl"]);
}

#[test]
fn test_stray_files_in_images_tree_are_fatal() {
    let classifier = ChangeClassifier::default();
    for path in ["wolfi-images/README.md", "wolfi-images/legacy/server.yaml", "wolfi-images/.yaml"] {
        let err = classifier.classify_image_changes(&[path]).unwrap_err();
        assert!(err.is_classification(), "{} should be fatal", path);
    }
}

#[test]
fn test_tagged_result() {
    let classifier = ChangeClassifier::default();
    let kinds: Vec<ChangeKind> = [
        "wolfi-packages/curl.yaml",
        "wolfi-images/gitserver.yaml",
        "go.mod",
    ]
    .iter()
    .map(|p| classifier.classify(p))
    .collect();

    assert_eq!(
        kinds,
        vec![
            ChangeKind::Package("curl".to_string()),
            ChangeKind::Image("gitserver".to_string()),
            ChangeKind::Unrecognized,
        ]
    );
}
