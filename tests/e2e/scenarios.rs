use super::helpers::{kind_of, TestProject, APACHE_HEADER_BODY, STANDARD_NOTICE};

fn third_party_source(with_notice: bool) -> String {
    let mut source = String::from(
        "/*\n * Original files: https://github.com/BigBadaboom/androidsvg/blob/master/CanvasLegacy.java\n *\n",
    );
    source.push_str(APACHE_HEADER_BODY);
    if with_notice {
        source.push_str(" *\n * This file may have been modified by ByteDance Ltd. and/or its affiliates.\n");
    }
    source.push_str(" */\npackage com.lynx.svg;\n");
    source
}

#[test]
fn test_all_scenarios_in_one_run() {
    let project = TestProject::new();
    project.write("src/Standard.java", STANDARD_NOTICE);
    project.write("src/ThirdParty.java", &third_party_source(true));
    project.write("src/NoNotice.java", &third_party_source(false));
    project.write("src/Bare.java", "package com.lynx;\n\nclass Bare {}\n");
    project.write("src/Disclaimer.c", "/* THIS SOFTWARE IS PROVIDED FOR DEMONSTRATION PURPOSES ONLY. */\nint x;\n");
    project.write("docs/notes.xyz", "no comments here\n");

    let (output, report) = project.check_json(&[]);
    assert!(output.status.success());

    assert_eq!(kind_of(&report, "Standard.java").as_deref(), Some("compliant"));
    assert_eq!(kind_of(&report, "ThirdParty.java").as_deref(), Some("compliant-third-party"));
    assert_eq!(kind_of(&report, "NoNotice.java").as_deref(), Some("missing-modification-notice"));
    assert_eq!(kind_of(&report, "Bare.java").as_deref(), Some("missing-header"));
    assert_eq!(kind_of(&report, "Disclaimer.c").as_deref(), Some("unrecognized-header"));
    assert_eq!(kind_of(&report, "notes.xyz").as_deref(), Some("exempt"));

    let summary = &report["summary"];
    assert_eq!(summary["total_files"], 6);
    assert_eq!(summary["failures"], 3);
    assert_eq!(summary["counts"]["compliant"], 1);
    assert_eq!(summary["counts"]["unreadable"], 0);
    assert_eq!(summary["non_compliant"].as_array().map(|a| a.len()), Some(3));

    // Verdicts come back sorted by path
    let paths: Vec<&str> = report["verdicts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["path"].as_str().unwrap())
        .collect();
    let mut sorted = paths.clone();
    sorted.sort();
    assert_eq!(paths, sorted);

    let third_party = report["verdicts"]
        .as_array()
        .unwrap()
        .iter()
        .find(|v| v["path"].as_str().unwrap().ends_with("ThirdParty.java"))
        .unwrap();
    assert_eq!(third_party["template_id"], "apache-2.0-with-modification");
    assert_eq!(third_party["bindings"]["holder"], "Paul LeBeau, Cave Rock Software Ltd.");
}

#[test]
fn test_exit_codes() {
    let project = TestProject::new();
    project.write("good/A.java", STANDARD_NOTICE);
    project.write("bad/B.java", "class B {}\n");

    let clean = project.run_auditor(&["check", "good"]);
    assert!(clean.status.success());
    assert!(String::from_utf8_lossy(&clean.stdout).contains("No issues found!"));

    let failing = project.run_auditor(&["check"]);
    assert_eq!(failing.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&failing.stderr);
    assert!(stderr.contains("Header violations found"));
    assert!(String::from_utf8_lossy(&failing.stdout).contains("missing-header"));

    let forgiven = project.run_auditor(&["check", "--exit-zero"]);
    assert!(forgiven.status.success());

    project.write(".header-auditor.toml", "fail_on_violations = false\n");
    let lenient = project.run_auditor(&["check"]);
    assert!(lenient.status.success());
}

#[test]
fn test_output_formats_and_file() {
    let project = TestProject::new();
    project.write("A.java", STANDARD_NOTICE);

    let table = project.run_auditor(&["check", "--format", "table", "--verbose"]);
    assert!(table.status.success());
    let stdout = String::from_utf8_lossy(&table.stdout);
    assert!(stdout.contains("Header Summary (1 files)"));
    assert!(stdout.contains("standard-notice"));

    let written = project.run_auditor(&["check", "--format", "json", "--output", "report.json"]);
    assert!(written.status.success());
    let content = std::fs::read_to_string(project.path().join("report.json")).unwrap();
    let report: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(report["summary"]["counts"]["compliant"], 1);
}

#[test]
fn test_excluded_and_exempt_paths() {
    let project = TestProject::new();
    project.write("src/A.java", STANDARD_NOTICE);
    project.write("build/Generated.java", "class Generated {}\n");
    project.write("out/Other.java", "class Other {}\n");
    project.write("third_party/zlib/inflate.c", "int inflate();\n");
    project.write(
        ".header-auditor.toml",
        "exclude = [\"out\"]\nexempt = [\"third_party/**\"]\n",
    );

    let (_, report) = project.check_json(&[]);
    assert_eq!(kind_of(&report, "Generated.java"), None);
    assert_eq!(kind_of(&report, "Other.java"), None);
    assert_eq!(kind_of(&report, "inflate.c").as_deref(), Some("exempt"));
    assert_eq!(report["summary"]["failures"], 0);
}

#[test]
fn test_custom_template_and_language_override() {
    let project = TestProject::new();
    project.write("lib/tool.gni", "# Copyright 2021 ACME Corp. Confidential.\n\nfoo = 1\n");
    project.write(
        ".header-auditor.toml",
        r#"
[languages]
gni = "gn"

[[templates]]
id = "acme"
lines = ["Copyright {year} ACME Corp. Confidential."]
"#,
    );

    let (_, report) = project.check_json(&[]);
    assert_eq!(kind_of(&report, "tool.gni").as_deref(), Some("compliant"));
    assert_eq!(report["verdicts"][0]["template_id"], "acme");
}

#[test]
fn test_fail_fast() {
    let project = TestProject::new();
    for i in 0..50 {
        project.write(&format!("src/f{:02}.c", i), "int x;\n");
    }

    let (_, report) = project.check_json(&["--fail-fast"]);
    assert_eq!(report["summary"]["aborted"], true);
    let checked = report["summary"]["checked"].as_u64().unwrap();
    let skipped = report["summary"]["skipped"].as_u64().unwrap();
    assert_eq!(checked + skipped, 50);
}

#[test]
fn test_malformed_template_is_fatal() {
    let project = TestProject::new();
    project.write("A.java", STANDARD_NOTICE);
    project.write(
        ".header-auditor.toml",
        r#"
[[templates]]
id = "broken"
lines = ["Copyright {year"]
"#,
    );

    let check = project.run_auditor(&["check", "--exit-zero"]);
    assert!(!check.status.success());
    assert!(String::from_utf8_lossy(&check.stderr).contains("unterminated placeholder"));
    assert!(!String::from_utf8_lossy(&check.stdout).contains("Header Summary"));

    let validate = project.run_auditor(&["config", "--validate"]);
    assert_eq!(validate.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&validate.stderr).contains("Configuration validation failed"));
}

#[test]
fn test_templates_command() {
    let project = TestProject::new();

    let table = project.run_auditor(&["templates"]);
    assert!(table.status.success());
    let stdout = String::from_utf8_lossy(&table.stdout);
    assert!(stdout.contains("standard-notice"));
    assert!(stdout.contains("bsd-chromium-with-modification"));

    let json = project.run_auditor(&["templates", "--format", "json"]);
    let templates: serde_json::Value = serde_json::from_slice(&json.stdout).unwrap();
    let ids: Vec<&str> = templates
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids.first().copied(), Some("standard-apache-full"));
    assert_eq!(ids.last().copied(), Some("standard-notice"));
}

#[test]
fn test_init_and_config_commands() {
    let project = TestProject::new();

    let init = project.run_auditor(&["init"]);
    assert!(init.status.success());
    assert!(project.path().join(".header-auditor.toml").exists());

    let again = project.run_auditor(&["init"]);
    assert!(!again.status.success());
    assert!(String::from_utf8_lossy(&again.stderr).contains("already exists"));

    let validate = project.run_auditor(&["config", "--validate"]);
    assert!(validate.status.success());

    let show = project.run_auditor(&["config", "--show"]);
    assert!(show.status.success());
    let config: serde_json::Value = serde_json::from_slice(&show.stdout).unwrap();
    assert_eq!(config["format"], "table");

    let neither = project.run_auditor(&["config"]);
    assert_eq!(neither.status.code(), Some(1));
}

#[test]
fn test_explicit_config_path() {
    let project = TestProject::new();
    project.write("A.java", "class A {}\n");
    project.write("ci/strict.toml", "fail_on_violations = false\n");

    let output = project.run_auditor(&["--config", "ci/strict.toml", "check"]);
    assert!(output.status.success());

    let missing = project.run_auditor(&["--config", "ci/missing.toml", "check"]);
    assert!(!missing.status.success());
    assert!(String::from_utf8_lossy(&missing.stderr).contains("Config file not found"));
}

#[test]
fn test_third_party_holder_list() {
    let project = TestProject::new();
    project.write(
        "base/values.cc",
        "// Copyright 2012 The Chromium Authors. All rights reserved.\n\
         // Use of this source code is governed by a BSD-style license.\n\
         \n\
         int x;\n",
    );

    let (_, before) = project.check_json(&[]);
    assert_eq!(kind_of(&before, "values.cc").as_deref(), Some("unrecognized-header"));

    project.write(".header-auditor.toml", "third_party_holders = [\"The Chromium Authors\"]\n");
    let (output, after) = project.check_json(&[]);
    assert!(output.status.success());
    assert_eq!(kind_of(&after, "values.cc").as_deref(), Some("compliant-third-party"));
    assert_eq!(after["verdicts"][0]["bindings"]["holder"], "The Chromium Authors");
}
