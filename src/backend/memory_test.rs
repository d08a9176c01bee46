use super::*;

fn key_value(key: &str, create: i64, modr: i64, ver: i64) -> KeyValue {
    KeyValue {
        key: key.as_bytes().to_vec(),
        create_revision: create,
        mod_revision: modr,
        version: ver,
        lease: 0,
        value: key.as_bytes().to_vec(),
    }
}

#[test]
fn test_memory_scan() {
    let mut be = Memory::new();
    for main in 1..=10 {
        let kv = key_value("key", 1, main, main);
        be.put_record(Revision::new(main, 0), false, &kv).unwrap();
    }
    assert_eq!(be.len_records(), 10);

    let snap = be.snapshot();

    let low = Revision::new(1, 0).to_bytes(false);
    let high = Revision::max().to_bytes(true);

    // ascending order, limit honored.
    let entries = snap.scan(&low, &high, 4).unwrap();
    assert_eq!(entries.len(), 4);
    let revs: Vec<Revision> = entries
        .iter()
        .map(|(key, _)| Revision::from_bytes(key).unwrap())
        .collect();
    assert_eq!(
        revs,
        [
            Revision::new(1, 0),
            Revision::new(2, 0),
            Revision::new(3, 0),
            Revision::new(4, 0)
        ]
    );

    // bounds are inclusive.
    let low = Revision::new(4, 0).to_bytes(false);
    let high = Revision::new(6, 0).to_bytes(true);
    let entries = snap.scan(&low, &high, 100).unwrap();
    assert_eq!(entries.len(), 3);

    // snapshot view is pinned at open.
    let kv = key_value("key", 1, 100, 11);
    be.put_record(Revision::new(100, 0), false, &kv).unwrap();
    let low = Revision::new(1, 0).to_bytes(false);
    let high = Revision::max().to_bytes(true);
    assert_eq!(snap.scan(&low, &high, 1000).unwrap().len(), 10);
    assert_eq!(be.snapshot().scan(&low, &high, 1000).unwrap().len(), 11);

    snap.close().unwrap();
}

#[test]
fn test_memory_meta() {
    let mut be = Memory::new();
    assert_eq!(be.get_meta("version".as_bytes()), None);

    be.set_meta("version".as_bytes(), "3.5.0".as_bytes());
    assert_eq!(
        be.get_meta("version".as_bytes()),
        Some("3.5.0".as_bytes().to_vec())
    );

    be.set_meta("version".as_bytes(), "3.6.0".as_bytes());
    assert_eq!(
        be.get_meta("version".as_bytes()),
        Some("3.6.0".as_bytes().to_vec())
    );
}
