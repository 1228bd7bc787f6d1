use std::path::Path;
use std::process::Command;

pub(crate) fn drive_root_exists(root: &str) -> bool {
    Path::new(root).is_dir()
}

pub(crate) fn shell_command(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    cmd
}
