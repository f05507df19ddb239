use std::path::Path;

use assert_cmd::Command;
use insta_cmd::get_cargo_bin;

pub fn pt_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("pt"));
	cmd.env("NO_COLOR", "1").env_remove("PT_LOG");
	cmd
}

/// Write `files` below `root`, creating parent directories as needed.
pub fn write_files(root: &Path, files: &[(&str, &str)]) -> std::io::Result<()> {
	for (path, content) in files {
		let path = root.join(path);
		if let Some(parent) = path.parent() {
			std::fs::create_dir_all(parent)?;
		}
		std::fs::write(path, content)?;
	}

	Ok(())
}
