//! End-to-end tests for the stubgen binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use stubgen_classfile::{AccessFlags, ClassFile, ClassWriter, MethodDescriptor, JAVA_8};
use tempfile::TempDir;

fn write_interface(root: &Path, name: &str, supers: &[&str], methods: &[(&str, &str)]) {
    let mut writer = ClassWriter::new(
        JAVA_8,
        AccessFlags(0x0601),
        name,
        Some("java/lang/Object"),
        supers,
    )
    .unwrap();
    for (method, descriptor) in methods {
        writer
            .abstract_method(
                AccessFlags::PUBLIC | AccessFlags::ABSTRACT,
                method,
                &MethodDescriptor::parse(descriptor).unwrap(),
                &[],
            )
            .unwrap();
    }
    write_class_file(root, name, writer);
}

fn write_class_file(root: &Path, name: &str, writer: ClassWriter) {
    let path = root.join(format!("{}.class", name));
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, writer.to_bytes().unwrap()).unwrap();
}

/// Class directory with `SimpleInterface`, `SubInterface extends SimpleInterface`, and a
/// plain class `NotAnInterface`.
fn fixture_classes() -> TempDir {
    let dir = TempDir::new().unwrap();
    write_interface(
        dir.path(),
        "org/example/SimpleInterface",
        &[],
        &[("foo", "()Ljava/lang/String;"), ("blah", "()V")],
    );
    write_interface(
        dir.path(),
        "org/example/SubInterface",
        &["org/example/SimpleInterface"],
        &[("test", "()I")],
    );
    let plain = ClassWriter::new(
        JAVA_8,
        AccessFlags::PUBLIC | AccessFlags::SUPER,
        "org/example/NotAnInterface",
        Some("java/lang/Object"),
        &[],
    )
    .unwrap();
    write_class_file(dir.path(), "org/example/NotAnInterface", plain);
    dir
}

fn stubgen() -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("stubgen").unwrap();
    cmd.env_remove("STUBGEN_CLASSPATH")
        .env_remove("STUBGEN_DEFAULT_EXCEPTION")
        .env_remove("STUBGEN_NO_BOOTSTRAP")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_generate_writes_class_file() {
    let classes = fixture_classes();
    let out = TempDir::new().unwrap();

    stubgen()
        .arg("--classpath")
        .arg(classes.path())
        .arg("generate")
        .args(["--interface", "org.example.SubInterface"])
        .args(["--name", "org.example.dummy.DummySub"])
        .arg("--out")
        .arg(out.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Generated org.example.dummy.DummySub (3 methods)",
        ));

    let path = out.path().join("org/example/dummy/DummySub.class");
    let class = ClassFile::parse(&std::fs::read(path).unwrap()).unwrap();
    assert_eq!(class.this_class, "org/example/dummy/DummySub");
    assert_eq!(class.interfaces, vec!["org/example/SubInterface".to_string()]);
    assert!(class.method("test", "()I").is_some());
    assert!(class.method("foo", "()Ljava/lang/String;").is_some());
    assert!(class.method("blah", "()V").is_some());
}

#[test]
fn test_generate_json_with_package_naming() {
    let classes = fixture_classes();
    let out = TempDir::new().unwrap();

    let output = stubgen()
        .env("STUBGEN_CLASSPATH", classes.path())
        .args(["--json", "generate"])
        .args(["--interface", "org.example.SimpleInterface"])
        .args(["--package", "org.example.dummy"])
        .args(["--exception", "java.lang.IllegalStateException"])
        .arg("--out")
        .arg(out.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        json["class"],
        "org.example.dummy.Dummy_org_example_SimpleInterface"
    );
    assert_eq!(json["methods"], 2);
    assert!(out
        .path()
        .join("org/example/dummy/Dummy_org_example_SimpleInterface.class")
        .exists());
}

#[test]
fn test_generate_rejects_non_interface() {
    let classes = fixture_classes();
    let out = TempDir::new().unwrap();

    stubgen()
        .arg("--classpath")
        .arg(classes.path())
        .arg("generate")
        .args(["--interface", "org.example.NotAnInterface"])
        .args(["--name", "org.example.Dummy"])
        .arg("--out")
        .arg(out.path())
        .assert()
        .code(3)
        .stderr(predicate::str::contains(
            "Class org.example.NotAnInterface is not an interface!",
        ));
    assert!(!out.path().join("org/example/Dummy.class").exists());
}

#[test]
fn test_generate_rejects_non_throwable() {
    let classes = fixture_classes();
    let out = TempDir::new().unwrap();

    stubgen()
        .arg("--classpath")
        .arg(classes.path())
        .arg("generate")
        .args(["--interface", "org.example.SimpleInterface"])
        .args(["--name", "org.example.Dummy"])
        .args(["--exception", "java.lang.String"])
        .arg("--out")
        .arg(out.path())
        .assert()
        .code(3)
        .stderr(predicate::str::contains(
            "Class java.lang.String does not extend Throwable!",
        ));
}

#[test]
fn test_generate_unknown_interface_is_invalid_argument() {
    let classes = fixture_classes();
    let out = TempDir::new().unwrap();

    stubgen()
        .arg("--classpath")
        .arg(classes.path())
        .args(["--json", "generate"])
        .args(["--interface", "org.example.Missing"])
        .args(["--name", "org.example.Dummy"])
        .arg("--out")
        .arg(out.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("\"invalid_argument\""));
}

#[test]
fn test_generate_without_name_or_package_is_invalid_argument() {
    let classes = fixture_classes();
    let out = TempDir::new().unwrap();

    stubgen()
        .arg("--classpath")
        .arg(classes.path())
        .arg("generate")
        .args(["--interface", "org.example.SimpleInterface"])
        .arg("--out")
        .arg(out.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("missing required argument `name`"));
    assert!(!out.path().join("org").exists());
}

#[test]
fn test_no_bootstrap_leaves_exception_unresolved() {
    let classes = fixture_classes();
    let out = TempDir::new().unwrap();

    stubgen()
        .arg("--classpath")
        .arg(classes.path())
        .arg("--no-bootstrap")
        .arg("generate")
        .args(["--interface", "org.example.SimpleInterface"])
        .args(["--name", "org.example.Dummy"])
        .arg("--out")
        .arg(out.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains(
            "java.lang.UnsupportedOperationException was not found",
        ));
}

#[test]
fn test_batch_reports_each_request() {
    let classes = fixture_classes();
    let out = TempDir::new().unwrap();
    let manifest = out.path().join("manifest.json");
    std::fs::write(
        &manifest,
        r#"{
            "package": "gen",
            "exception": "java.lang.IllegalStateException",
            "requests": [
                {"interface": "org.example.SimpleInterface"},
                {"interface": "org.example.SubInterface", "name": "gen.Sub"},
                {"interface": "org.example.NotAnInterface"}
            ]
        }"#,
    )
    .unwrap();

    let output = stubgen()
        .arg("--classpath")
        .arg(classes.path())
        .args(["--json", "batch"])
        .arg("--manifest")
        .arg(&manifest)
        .arg("--out")
        .arg(out.path().join("classes"))
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["generated"], 2);
    assert_eq!(report["failed"], 1);
    let classes_json = report["classes"].as_array().unwrap();
    assert_eq!(classes_json[0]["name"], "gen.Dummy_org_example_SimpleInterface");
    assert_eq!(classes_json[1]["methods"], 3);
    assert_eq!(classes_json[2]["kind"], "precondition_violation");

    assert!(out.path().join("classes/gen/Sub.class").exists());
    assert!(out
        .path()
        .join("classes/gen/Dummy_org_example_SimpleInterface.class")
        .exists());
}

#[test]
fn test_batch_success() {
    let classes = fixture_classes();
    let out = TempDir::new().unwrap();
    let manifest = out.path().join("manifest.json");
    std::fs::write(
        &manifest,
        r#"{"requests": [{"interface": "org.example.SimpleInterface", "name": "gen.Simple"}]}"#,
    )
    .unwrap();

    stubgen()
        .arg("--classpath")
        .arg(classes.path())
        .arg("batch")
        .arg("--manifest")
        .arg(&manifest)
        .arg("--out")
        .arg(out.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated 1 of 1 classes"));
}

#[test]
fn test_methods_lists_inherited() {
    let classes = fixture_classes();

    let output = stubgen()
        .arg("--classpath")
        .arg(classes.path())
        .args(["--json", "methods"])
        .args(["--interface", "org.example.SubInterface"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let methods: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let names: Vec<_> = methods
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["test", "foo", "blah"]);
    assert_eq!(
        methods[1]["description"],
        "public abstract java.lang.String org.example.SimpleInterface.foo()"
    );
}

#[test]
fn test_methods_rejects_internal_form_name() {
    let classes = fixture_classes();

    stubgen()
        .arg("--classpath")
        .arg(classes.path())
        .arg("methods")
        .args(["--interface", "org/example/SubInterface"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains(
            "`org/example/SubInterface` is not a valid binary class name for `interface`",
        ));

    stubgen()
        .arg("--classpath")
        .arg(classes.path())
        .arg("methods")
        .args(["--interface", "org..example.SubInterface"])
        .assert()
        .code(2);
}

#[test]
fn test_dump_generated_class() {
    let classes = fixture_classes();
    let out = TempDir::new().unwrap();

    stubgen()
        .arg("--classpath")
        .arg(classes.path())
        .arg("generate")
        .args(["--interface", "org.example.SimpleInterface"])
        .args(["--name", "org.example.DummySimple"])
        .arg("--out")
        .arg(out.path())
        .assert()
        .success();

    stubgen()
        .arg("--verbose")
        .arg("dump")
        .arg(out.path().join("org/example/DummySimple.class"))
        .assert()
        .success()
        .stdout(predicate::str::contains("version: 52.0"))
        .stdout(predicate::str::contains(
            "implements: org.example.SimpleInterface",
        ))
        .stdout(predicate::str::contains(
            "new java/lang/UnsupportedOperationException",
        ))
        .stdout(predicate::str::contains("athrow"));
}

#[test]
fn test_dump_rejects_garbage() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("Bad.class");
    std::fs::write(&path, [0xCA, 0xFE, 0xBA]).unwrap();

    stubgen()
        .arg("dump")
        .arg(&path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed to parse class file"));
}
