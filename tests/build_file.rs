// Build file driven runs, from loading through the written stylesheet
use cssopt::cli::{check_command, load_config, optimize_command};
use cssopt::{BuildVariables, ConfigOverrides, OptimizationMode, PipelineError};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const BUILD_FILE: &str = r#"({
    cssIn: "${project.basedir}/src/main/webapp/assets/css/styles.css",
    out: "${project.build.webapp}/assets/css/styles.min.css",

    // CSS optimization options are:
    //  - "standard": @import inlining, comment removal and line returns.
    //  - "standard.keepLines": like "standard" but keeps line returns.
    //  - "standard.keepComments": keeps the file comments, but removes line returns.
    //  - "standard.keepComments.keepLines": keeps the file comments and line returns.
    //  - "none": skip CSS optimizations.
    optimizeCss: "standard"
})
"#;

fn project(tmp: &TempDir) -> (std::path::PathBuf, BuildVariables) {
    let base = tmp.path();
    let css_dir = base.join("src/main/webapp/assets/css");
    fs::create_dir_all(&css_dir).unwrap();
    fs::write(css_dir.join("layout.css"), "/* layout */\n.grid { display: grid; }\n").unwrap();
    fs::write(
        css_dir.join("styles.css"),
        "@import \"layout.css\";\n/* main */\nbody {\n  margin: 0;\n}\n",
    )
    .unwrap();

    let build_file = base.join("optimise-css.build.js");
    fs::write(&build_file, BUILD_FILE).unwrap();

    let vars: BuildVariables = [
        ("project.basedir", base.display().to_string()),
        (
            "project.build.webapp",
            base.join("target/webapp").display().to_string(),
        ),
    ]
    .into_iter()
    .collect();

    (build_file, vars)
}

#[test]
fn test_build_file_end_to_end() {
    let tmp = TempDir::new().unwrap();
    let (build_file, vars) = project(&tmp);

    let report =
        optimize_command(Some(build_file), ConfigOverrides::default(), vars, false).unwrap();

    let out = tmp
        .path()
        .join("target/webapp/assets/css/styles.min.css");
    assert_eq!(report.output, out);
    assert_eq!(
        fs::read_to_string(&out).unwrap(),
        ".grid {display: grid;} body {margin: 0;}"
    );
}

#[test]
fn test_mode_override_from_command_line() {
    let tmp = TempDir::new().unwrap();
    let (build_file, vars) = project(&tmp);

    let overrides = ConfigOverrides {
        optimize_css: Some("standard.keepComments.keepLines".to_string()),
        ..Default::default()
    };
    let config = load_config(Some(&build_file), &overrides, &vars).unwrap();
    assert_eq!(config.mode(), OptimizationMode::StandardKeepCommentsKeepLines);
}

#[test]
fn test_invalid_mode_fails_before_any_file_io() {
    let tmp = TempDir::new().unwrap();
    let build_file = tmp.path().join("bad.build.js");
    // neither stylesheet exists; the mode error must still be the one reported
    fs::write(
        &build_file,
        r#"({ cssIn: "missing/in.css", out: "missing/out.css", optimizeCss: "standard.keepEverything" })"#,
    )
    .unwrap();

    let err = optimize_command(
        Some(build_file),
        ConfigOverrides::default(),
        BuildVariables::new(),
        false,
    )
    .unwrap_err();

    assert!(matches!(err, PipelineError::InvalidMode(ref m) if m == "standard.keepEverything"));
    assert!(!tmp.path().join("missing").exists());
}

#[test]
fn test_unresolved_placeholder() {
    let tmp = TempDir::new().unwrap();
    let (build_file, _) = project(&tmp);

    let err = check_command(&build_file, BuildVariables::new()).unwrap_err();
    assert!(matches!(err, PipelineError::InvalidConfig(ref m) if m.contains("project.basedir")));
}

#[test]
fn test_check_command_does_not_touch_stylesheets() {
    let tmp = TempDir::new().unwrap();
    let (build_file, vars) = project(&tmp);

    let config = check_command(&build_file, vars).unwrap();
    assert_eq!(config.mode(), OptimizationMode::Standard);
    assert!(!tmp.path().join("target").exists());
}

#[test]
fn test_relative_paths_follow_build_file_location() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("web");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("a.css"), "a { b: c; }\n").unwrap();
    let build_file = dir.join("build.js");
    fs::write(
        &build_file,
        "{ cssIn: 'a.css', out: 'dist/a.css', optimizeCss: 'none', }",
    )
    .unwrap();

    optimize_command(
        Some(build_file),
        ConfigOverrides::default(),
        BuildVariables::new(),
        false,
    )
    .unwrap();

    assert_eq!(
        fs::read_to_string(Path::new(&dir).join("dist/a.css")).unwrap(),
        "a { b: c; }\n"
    );
}
