use std::error::Error;

use win_unc::{UncDirectory, columns, parse_net_use_table};

const SAMPLE: &str = r"
New connections will be remembered.


Status       Local     Remote                    Network

-------------------------------------------------------------------------------
OK           Z:        \\fileserver\projects     Microsoft Windows Network
Disconnected Y:        \\backup.example.org\nightly-archive-share
                                                 Microsoft Windows Network
OK                     \\fileserver\IPC$         Microsoft Windows Network
The command completed successfully.
";

fn main() -> Result<(), Box<dyn Error>> {
    let dir: UncDirectory = r"alice:hunter2@\\FileServer\Projects\".parse()?;
    println!("Directory: {dir:?}");
    println!("Normalized: {}", dir.normalized_path());

    let table = parse_net_use_table(SAMPLE);
    for row in table.rows() {
        println!("{row:?}");
    }

    let remote = dir.normalized_path();
    let matches = table.get_matching_rows(&[(columns::REMOTE, remote.as_str())]);
    println!("Rows for {}: {}", dir.path(), matches.len());

    Ok(())
}
