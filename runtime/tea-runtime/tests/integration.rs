///
/// # Integration Tests for tea-runtime
///
/// End-to-end tests covering config discovery from `tea.toml`, runtime
/// initialization, and compiled-program style use of records and stream
/// wrappers through the re-exported runtime surface.
///

use std::cell::RefCell;
use std::fs;
use std::rc::Rc;
use tempfile::TempDir;

use tea_runtime::{
    CallShape, ConfigError, Decoding, Io, LookupError, NativeRunnable, Object, Record,
    RuntimeConfig, Value, init, with_stdio,
};

#[test]
fn test_discover_without_config_file_uses_defaults() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config = RuntimeConfig::discover_in(temp_dir.path()).expect("discovery should succeed");
    assert_eq!(config, RuntimeConfig::default());
}

#[test]
fn test_discover_reads_tea_toml() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    fs::write(
        temp_dir.path().join("tea.toml"),
        "[runtime]\nlog_level = \"tea_std_io=debug\"\n\n[runtime.input]\ndecoding = \"strict\"\n",
    )
    .expect("Failed to write tea.toml");

    let config = RuntimeConfig::discover_in(temp_dir.path()).expect("discovery should succeed");
    assert_eq!(config.log_level, "tea_std_io=debug");
    assert_eq!(config.input.decoding, Decoding::Strict);
}

#[test]
fn test_load_missing_file_reports_path() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let path = temp_dir.path().join("absent.toml");
    let err = RuntimeConfig::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
    assert!(err.to_string().contains("absent.toml"));
}

#[test]
fn test_load_malformed_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let path = temp_dir.path().join("tea.toml");
    fs::write(&path, "[runtime\nlog_level = ").expect("Failed to write tea.toml");
    assert!(matches!(RuntimeConfig::load(&path), Err(ConfigError::Toml(_))));
}

#[test]
fn test_init_installs_configured_stdio() {
    let config = RuntimeConfig::from_toml_str("[runtime.input]\ndecoding = \"strict\"\n")
        .expect("config should parse");
    init(&config);
    assert_eq!(with_stdio(|io| io.decoding()), Decoding::Strict);

    let other_thread = std::thread::spawn(|| with_stdio(|io| io.decoding()))
        .join()
        .expect("reader thread should not panic");
    assert_eq!(other_thread, Decoding::Strict);
}

#[test]
fn test_compiled_object_workflow() {
    let out: Rc<RefCell<Vec<u8>>> = Rc::default();
    let err: Rc<RefCell<Vec<u8>>> = Rc::default();
    let io = Io::with_streams(out.clone(), err.clone());

    let mut point: Object = Record::new(
        [Rc::from("x"), Rc::from("y")],
        [Value::Number(1.0), Value::Number(2.0)],
    )
    .expect("equal lengths");

    point.set("y", Value::Number(20.0)).expect("y exists");
    point.add(Rc::from("x"), Value::Number(100.0));
    assert_eq!(point.len(), 3);
    assert_eq!(point.get("x"), Ok(&Value::Number(1.0)));
    assert!(matches!(
        point.get("z"),
        Err(LookupError::KeyNotFound { .. })
    ));

    let value = Value::object(point);
    io.println.invoke_generic(&value).expect("write to buffer");
    if let Some(n) = value.as_record().and_then(|r| r.borrow().get("y").ok().and_then(Value::as_number)) {
        io.println.invoke_numeric(n).expect("write to buffer");
    }

    assert_eq!(
        String::from_utf8(out.borrow().clone()).unwrap(),
        "{ x: 1, y: 20, x: 100 }\n20\n"
    );
    assert!(err.borrow().is_empty());
}

#[test]
fn test_function_values_dispatch_through_records() {
    let calls: Rc<RefCell<Vec<CallShape>>> = Rc::default();
    let (generic, numeric) = (calls.clone(), calls.clone());
    let square = NativeRunnable::builder(move |_| {
        generic.borrow_mut().push(CallShape::Generic);
        Ok(())
    })
    .numeric(move |_| {
        numeric.borrow_mut().push(CallShape::Numeric);
        Ok(())
    })
    .build();

    let module: Object = Record::new([Rc::from("square")], [Value::native(square)])
        .expect("equal lengths");
    let entry = module.get("square").expect("square exists");
    let runnable = entry.as_native().expect("square is a function");

    runnable.invoke_numeric(4.0).expect("numeric call");
    runnable.invoke_text("4").expect("text call");

    assert_eq!(*calls.borrow(), vec![CallShape::Numeric, CallShape::Generic]);
}
