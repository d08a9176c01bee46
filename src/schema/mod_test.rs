use super::*;

use crate::backend::Memory;

#[test]
fn test_storage_version() {
    let tcs = [
        ("3.5.0", "3.5.0"),
        ("3.5.0-alpha", "3.5.0"),
        ("3.5.0-beta.0", "3.5.0"),
        ("3.5.0-rc.1", "3.5.0"),
        ("3.5.1", "3.5.0"),
        ("3.6.7", "3.6.0"),
    ];

    for (version, expect) in tcs.iter() {
        let mut be = Memory::new();
        set_storage_version(&mut be, &Version::parse(version).unwrap());

        let val = read_storage_version(&be).unwrap();
        assert_eq!(val.to_string(), *expect, "version {}", version);
    }
}

#[test]
fn test_storage_version_missing() {
    let be = Memory::new();
    assert_eq!(read_storage_version(&be), None);
}

#[test]
fn test_storage_version_corrupt() {
    let mut be = Memory::new();
    be.set_meta(STORAGE_VERSION_KEY, b"not-a-version");
    assert_eq!(read_storage_version(&be), None);
}
