use crate::FileIdentity;
use crate::PtError;
use crate::PtResult;

/// A directive extracted from a token's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
	/// `import <ref>`: a local export, or the whole processed file.
	ImportFile { reference: String },
	/// `import <ref> <name>`: a named export of another file.
	ImportExport { reference: String, name: String },
	/// `export <name>`: start capturing body text under `name`.
	Capture { name: String },
	/// `export <name> <value>`: store `value` under `name` immediately.
	/// The value is kept byte for byte.
	Export { name: String, value: Vec<u8> },
	/// `end`: store the active capture.
	End,
	/// Any other command after the prefix. These consume their token.
	Unrecognized { command: String },
}

impl Directive {
	/// Parse the bytes found between a pair of delimiters.
	///
	/// The token is trimmed and its first line must start with `prefix`,
	/// otherwise `Ok(None)` is returned and the token should be passed
	/// through untouched. The remainder of the first line is split on
	/// spaces into the command and its arguments. Everything after the first
	/// line break is appended verbatim as one final argument, without any
	/// text decoding.
	pub fn parse(token: &[u8], prefix: &str, file: &FileIdentity) -> PtResult<Option<Self>> {
		let token = token.trim_ascii();
		let (line, body) = match token.iter().position(|&byte| byte == b'\n') {
			Some(index) => (&token[..index], Some(&token[index + 1..])),
			None => (token, None),
		};

		let line = String::from_utf8_lossy(line);
		let Some(remainder) = line.trim_end().strip_prefix(prefix) else {
			return Ok(None);
		};

		let mut words = remainder.split(' ').filter(|word| !word.is_empty());
		let command = words.next().unwrap_or_default();
		let mut args: Vec<&[u8]> = words.map(str::as_bytes).collect();
		args.extend(body);

		let invalid = |expected: &'static str| {
			PtError::InvalidArguments {
				command: command.to_string(),
				expected,
				got: args.len(),
				file: file.to_string(),
			}
		};

		let directive = match (command, args.as_slice()) {
			("import", [reference]) => {
				Self::ImportFile {
					reference: text(reference),
				}
			}
			("import", [reference, name]) => {
				Self::ImportExport {
					reference: text(reference),
					name: text(name),
				}
			}
			("import", _) => return Err(invalid("`import <ref>` or `import <ref> <name>`")),
			("export", [name]) => Self::Capture { name: text(name) },
			("export", [name, value]) => {
				Self::Export {
					name: text(name),
					value: value.to_vec(),
				}
			}
			("export", _) => return Err(invalid("`export <name>` or `export <name> <value>`")),
			("end", []) => Self::End,
			("end", _) => return Err(invalid("`end` without arguments")),
			(command, _) => {
				Self::Unrecognized {
					command: command.to_string(),
				}
			}
		};

		Ok(Some(directive))
	}
}

/// Arguments other than an export value are names and paths.
fn text(bytes: &[u8]) -> String {
	String::from_utf8_lossy(bytes).into_owned()
}
