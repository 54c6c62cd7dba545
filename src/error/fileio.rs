use std::fmt;
use super::AsmError;

#[derive(Debug, Clone, PartialEq)]
pub enum FileIOError {
	MalformedHeader(MalformedHeaderError),
	/// Image was built by a different crate version
	VersionMismatch(String),
	Encode(String),
	Decode(String),
	/// A label points outside the decoded instruction list
	LabelOutOfRange(String, isize),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MalformedHeaderError {
	AsmProgramDecl,
	Version,
	ProgEnd,
}

impl fmt::Display for FileIOError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::MalformedHeader(h) => write!(f, "malformed program image ({:?})", h),
			Self::VersionMismatch(v) => write!(f, "program image built by version {}", v),
			Self::Encode(why) => write!(f, "could not encode program: {}", why),
			Self::Decode(why) => write!(f, "could not decode program: {}", why),
			Self::LabelOutOfRange(label, ip) => write!(f, "label '{}' points outside the program ({})", label, ip),
		}
	}
}

impl std::error::Error for FileIOError {}

impl AsmError for FileIOError { }

pub type FileIOResult<O=()> = Result<O, FileIOError>;
