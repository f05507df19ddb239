mod common;

use pt_core::AnyEmptyResult;
use rstest::rstest;
use similar_asserts::assert_eq;

const INLINE_EXPORT: &str = "<!--pt:export foo\nbar--><!--pt:import foo-->\n[pt:export foo\nbar][pt:import foo]\n";

#[test]
fn process_positional_input() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_files(
		tmp.path(),
		&[
			("main.md", "# Title\n<!-- pt:import other.md -->\n"),
			("other.md", "nothing special\n"),
		],
	)?;

	common::pt_cmd()
		.current_dir(tmp.path())
		.arg("main.md")
		.assert()
		.success()
		.stdout("# Title\nnothing special\n\n");

	Ok(())
}

#[test]
fn process_in_flag() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_files(tmp.path(), &[("main.md", INLINE_EXPORT)])?;

	common::pt_cmd()
		.arg("--in")
		.arg(tmp.path().join("main.md"))
		.assert()
		.success()
		.stdout("bar\n[pt:export foo\nbar][pt:import foo]\n");

	Ok(())
}

#[test]
fn process_writes_out_file() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_files(
		tmp.path(),
		&[(
			"main.md",
			"<!--pt:export foo-->\ndelimited reference\n<!--pt:end-->\n<!--pt:import foo-->\n",
		)],
	)?;

	common::pt_cmd()
		.current_dir(tmp.path())
		.args(["-i", "main.md", "-o", "out.md"])
		.assert()
		.success()
		.stdout("");

	let content = std::fs::read_to_string(tmp.path().join("out.md"))?;
	assert_eq!(content, "\ndelimited reference\n\ndelimited reference\n");

	Ok(())
}

#[test]
fn process_stdin() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_files(tmp.path(), &[("docs/b.md", "B")])?;

	common::pt_cmd()
		.current_dir(tmp.path())
		.write_stdin("a<!--pt:import docs/b.md-->c")
		.assert()
		.success()
		.stdout("aBc");

	Ok(())
}

#[test]
fn process_custom_delimiters() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_files(tmp.path(), &[("main.md", INLINE_EXPORT)])?;

	common::pt_cmd()
		.current_dir(tmp.path())
		.args(["main.md", "--start", "[", "--end", "]"])
		.assert()
		.success()
		.stdout("<!--pt:export foo\nbar--><!--pt:import foo-->\nbar\n");

	Ok(())
}

#[rstest]
#[case::hash("--prefix=#", "<!--export foo\nbar--><!--import foo-->\nbar\n")]
#[case::empty("--prefix=", "bar\n\n")]
fn process_custom_prefix(#[case] flag: &str, #[case] expected: &str) -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_files(
		tmp.path(),
		&[(
			"main.md",
			"<!--export foo\nbar--><!--import foo-->\n<!--#export foo\nbar--><!--#import foo-->\n",
		)],
	)?;

	let output = common::pt_cmd()
		.current_dir(tmp.path())
		.args(["main.md", flag])
		.output()?;

	assert!(output.status.success());
	assert_eq!(String::from_utf8(output.stdout)?, expected);

	Ok(())
}

#[test]
fn process_package_reference() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_files(
		tmp.path(),
		&[
			("node_modules/pkg/README.md", "# README\n"),
			("docs/main.md", "<!--pt:import pkg:README.md-->\n"),
		],
	)?;

	common::pt_cmd()
		.current_dir(tmp.path())
		.arg("docs/main.md")
		.assert()
		.success()
		.stdout("# README\n\n");

	Ok(())
}

#[test]
fn process_unresolved_reference_exits_with_error() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_files(tmp.path(), &[("main.md", "before\n<!--pt:import missing.md-->\n")])?;

	common::pt_cmd()
		.current_dir(tmp.path())
		.arg("main.md")
		.assert()
		.code(2)
		.stdout(predicates::str::contains("before"))
		.stderr(predicates::str::contains("pt::unresolved_reference"))
		.stderr(predicates::str::contains("missing.md"));

	Ok(())
}

#[test]
fn process_invalid_arguments_exits_with_error() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_files(tmp.path(), &[("main.md", "<!--pt:end now-->")])?;

	common::pt_cmd()
		.current_dir(tmp.path())
		.arg("main.md")
		.assert()
		.code(2)
		.stderr(predicates::str::contains("pt::invalid_arguments"));

	Ok(())
}

#[test]
fn process_missing_input_file() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::pt_cmd()
		.current_dir(tmp.path())
		.arg("nope.md")
		.assert()
		.code(2)
		.stderr(predicates::str::contains("nope.md"));

	Ok(())
}

#[test]
fn process_in_flag_takes_precedence() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_files(
		tmp.path(),
		&[("positional.md", "positional"), ("flagged.md", "flagged")],
	)?;

	common::pt_cmd()
		.current_dir(tmp.path())
		.args(["positional.md", "--in", "flagged.md"])
		.assert()
		.success()
		.stdout("flagged");

	Ok(())
}

#[cfg(target_os = "linux")]
#[test]
fn process_error_is_reported_before_failed_flush() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_files(tmp.path(), &[("main.md", "before<!--pt:end-->")])?;

	// Writes to `/dev/full` fail with `ENOSPC` once they are flushed.
	common::pt_cmd()
		.current_dir(tmp.path())
		.args(["main.md", "-o", "/dev/full"])
		.assert()
		.code(2)
		.stderr(predicates::str::contains("pt::no_active_capture"));

	Ok(())
}

#[test]
fn help_lists_options() {
	common::pt_cmd()
		.arg("--help")
		.assert()
		.success()
		.stdout(predicates::str::contains("--prefix"))
		.stdout(predicates::str::contains("--out"))
		.stdout(predicates::str::contains("pt:import"));
}
