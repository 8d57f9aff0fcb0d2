mod duration_filter;
mod ffprobe_info;
mod file_transfer;
mod path_validator;
mod range_parser;
mod time_format;
mod video_scanner;

pub use duration_filter::FilterCriteria;
pub use ffprobe_info::{DurationProbe, FfprobeProbe, ProbeOutcome};
pub use file_transfer::{
    FileOperationResult, FileSystem, FileTransferEngine, NO_MATCHING_FILES, ProgressCallback,
    StdFileSystem, TransferFailure, TransferOperation,
};
pub use path_validator::{
    ensure_directory_exists, normalize_path, paths_are_equal, validate_directory_exists,
};
pub use range_parser::parse_duration_range;
pub use time_format::format_duration;
pub use video_scanner::{DirectoryScanner, ScanReport, VideoFile, VideoRepository};
