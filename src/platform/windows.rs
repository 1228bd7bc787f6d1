use std::os::windows::process::CommandExt;
use std::process::Command;
use windows::{core::PCWSTR, Win32::Storage::FileSystem::GetDriveTypeW};

const DRIVE_NO_ROOT_DIR: u32 = 1;
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// `true` unless Windows reports no root directory for `root` (e.g. `"Z:\"`).
///
/// Unknown, removable, fixed, remote, CD-ROM and RAM disks all count as taken.
pub(crate) fn drive_root_exists(root: &str) -> bool {
    let wide: Vec<u16> = root.encode_utf16().chain(Some(0)).collect();

    let kind = unsafe { GetDriveTypeW(PCWSTR(wide.as_ptr())) };

    kind != DRIVE_NO_ROOT_DIR
}

/// `cmd /C <command>` with the command passed through untouched so the quoting
/// built for `NET USE` reaches `cmd` as written. No console window is opened.
pub(crate) fn shell_command(command: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C")
        .raw_arg(command)
        .creation_flags(CREATE_NO_WINDOW);
    cmd
}
