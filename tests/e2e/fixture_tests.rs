use super::helpers::{kind_of, TestProject};

const FIXTURES: &[(&str, &str, &str)] = &[
    (
        "CanvasLegacy.java",
        include_str!("../fixtures/CanvasLegacy.java"),
        "compliant-third-party",
    ),
    (
        "PaintingContextTest.java",
        include_str!("../fixtures/PaintingContextTest.java"),
        "compliant",
    ),
    (
        "RenderkitViewDelegate.java",
        include_str!("../fixtures/RenderkitViewDelegate.java"),
        "unrecognized-header",
    ),
    (
        "check_android_build.py",
        include_str!("../fixtures/check_android_build.py"),
        "compliant",
    ),
    ("log.py", include_str!("../fixtures/log.py"), "missing-header"),
];

fn fixture_project() -> TestProject {
    let project = TestProject::new();
    for (name, content, _) in FIXTURES {
        project.write(&format!("testcases/{}", name), content);
    }
    project
}

#[test]
fn test_fixture_verdicts() {
    let project = fixture_project();
    let (_, report) = project.check_json(&["testcases"]);

    for (name, _, expected) in FIXTURES {
        assert_eq!(
            kind_of(&report, name).as_deref(),
            Some(*expected),
            "unexpected verdict for {}",
            name
        );
    }
    assert_eq!(report["summary"]["total_files"], FIXTURES.len());
    assert_eq!(report["summary"]["failures"], 2);
}

#[test]
fn test_fixture_bindings() {
    let project = fixture_project();
    let (_, report) = project.check_json(&["testcases/CanvasLegacy.java", "testcases/check_android_build.py"]);
    let verdicts = report["verdicts"].as_array().unwrap();

    let canvas = verdicts
        .iter()
        .find(|v| v["path"].as_str().unwrap().ends_with("CanvasLegacy.java"))
        .unwrap();
    assert_eq!(canvas["template_id"], "apache-2.0-with-modification");
    assert_eq!(canvas["bindings"]["year"], "2013");
    assert!(canvas["bindings"]["attribution"]
        .as_str()
        .unwrap()
        .starts_with("files:https://github.com/BigBadaboom/androidsvg"));

    let script = verdicts
        .iter()
        .find(|v| v["path"].as_str().unwrap().ends_with("check_android_build.py"))
        .unwrap();
    assert_eq!(script["template_id"], "standard-notice");
    assert_eq!(script["language"], "python");
}

#[test]
fn test_unrecognized_reason_points_at_line() {
    let project = fixture_project();
    let output = project.run_auditor(&["check", "testcases/RenderkitViewDelegate.java"]);

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("unrecognized-header"));
    assert!(stdout.contains("line 2"));
}

#[test]
fn test_strict_residual_rejects_split_attribution() {
    let project = fixture_project();
    project.write(".header-auditor.toml", "max_leading_residual = 0\n");

    let (_, report) = project.check_json(&["testcases/CanvasLegacy.java"]);
    assert_eq!(kind_of(&report, "CanvasLegacy.java").as_deref(), Some("unrecognized-header"));
}
