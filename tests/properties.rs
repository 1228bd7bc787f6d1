use proptest::prelude::*;
use win_unc::{DiskDrive, UncDirectory};

fn unc_path() -> impl Strategy<Value = String> {
    r"\\\\[a-z0-9][a-z0-9.-]{0,11}(\\[A-Za-z0-9$._-]([A-Za-z0-9 $._-]{0,8}[A-Za-z0-9$._-])?){0,3}\\{0,2}"
}

fn username() -> impl Strategy<Value = Option<String>> {
    proptest::option::of("[A-Za-z0-9._-]{1,10}")
}

fn password() -> impl Strategy<Value = Option<String>> {
    proptest::option::of("[ -~]{0,12}")
}

proptest! {
    #[test]
    fn display_then_parse_round_trips(path in unc_path(), user in username(), pass in password()) {
        let dir = UncDirectory::with_login(&path, user.as_deref(), pass.as_deref()).unwrap();
        let parsed: UncDirectory = dir.to_string().parse().unwrap();
        prop_assert_eq!(parsed.path(), dir.path());
        prop_assert_eq!(parsed, dir);
    }

    #[test]
    fn normalized_path_is_a_fixed_point(path in unc_path()) {
        let normalized = UncDirectory::new(&path).unwrap().normalized_path();
        prop_assert_eq!(UncDirectory::new(&normalized).unwrap().normalized_path(), normalized);
    }

    #[test]
    fn ipc_share_and_case_do_not_matter(host in "[a-z][a-z0-9]{0,10}", ipc in "(IPC|ipc|Ipc)\\$") {
        let bare = UncDirectory::new(&format!(r"\\{host}")).unwrap();
        let upper = UncDirectory::new(&format!(r"\\{}\{ipc}", host.to_uppercase())).unwrap();
        prop_assert_eq!(bare.normalized_path(), upper.normalized_path());
        prop_assert_eq!(bare, upper);
    }

    #[test]
    fn drive_spellings_agree(letter in "[a-zA-Z]", suffix in "(|:|:\\\\)") {
        let drive = DiskDrive::new(&format!("{letter}{suffix}")).unwrap();
        prop_assert_eq!(drive.drive(), format!("{}:", letter.to_uppercase()));
    }
}
