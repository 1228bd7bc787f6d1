cfg_if::cfg_if! {
    if #[cfg(target_os = "windows")] {
        mod windows;
        pub(crate) use self::windows::{drive_root_exists, shell_command};
    } else if #[cfg(target_family = "unix")] {
        mod unix;
        pub(crate) use self::unix::{drive_root_exists, shell_command};
    } else {
        compile_error!("unsupported platform");
    }
}
