// ===== File Access Modes =====
// Source: include/uapi/asm-generic/fcntl.h
pub const O_RDONLY: i32 = 0o0; // Open read-only
pub const O_WRONLY: i32 = 0o1; // Open write-only
pub const O_RDWR: i32 = 0o2; // Open read-write
pub const O_RDWRFLAGS: i32 = 0o3; // Mask for access modes

// ===== File Creation Flags =====
pub const O_CREAT: i32 = 0o100; // Create file if it doesn't exist

// ===== File Permissions =====
// Source: include/uapi/linux/stat.h
pub const S_IRUSR: u32 = 0o400; // User read
pub const S_IWUSR: u32 = 0o200; // User write

// ===== Seek Whence =====
pub const SEEK_SET: i32 = 0; // Seek from beginning of file
pub const SEEK_CUR: i32 = 1; // Seek from current position
pub const SEEK_END: i32 = 2; // Seek from end of file

//Commands for FCNTL
// Source: include/linux/fcntl.h
pub const F_GETFL: i32 = 3;
