use super::*;

#[test]
fn test_key_index_put() {
    let mut ki = KeyIndex::new("key".as_bytes().to_vec());
    assert!(ki.is_empty());

    ki.put(2, 0);
    assert!(!ki.is_empty());
    assert_eq!(ki.to_modified(), Revision::new(2, 0));

    ki.put(4, 2);
    assert_eq!(ki.to_modified(), Revision::new(4, 2));

    let gens = ki.as_generations();
    assert_eq!(gens.len(), 1);
    assert_eq!(gens[0].to_created(), Revision::new(2, 0));
    assert_eq!(gens[0].to_ver(), 2);
    assert_eq!(
        gens[0].as_revs(),
        [Revision::new(2, 0), Revision::new(4, 2)]
    );
}

#[test]
fn test_key_index_tombstone() {
    let mut ki = KeyIndex::new("key".as_bytes().to_vec());

    match ki.tombstone(1, 0) {
        Err(Error::NoOpenGeneration(_, _)) => (),
        res => panic!("unexpected {:?}", res),
    }

    ki.put(1, 0);
    ki.put(2, 0);
    ki.tombstone(3, 0).unwrap();

    let gens = ki.as_generations();
    assert_eq!(gens.len(), 2);
    assert_eq!(gens[0].to_ver(), 3);
    assert_eq!(
        gens[0].as_revs(),
        [Revision::new(1, 0), Revision::new(2, 0), Revision::new(3, 0)]
    );
    assert!(gens[1].is_empty());

    // no open generation till the next put.
    match ki.tombstone(4, 0) {
        Err(Error::NoOpenGeneration(_, _)) => (),
        res => panic!("unexpected {:?}", res),
    }

    ki.put(5, 0);
    let gens = ki.as_generations();
    assert_eq!(gens.len(), 2);
    assert_eq!(gens[1].to_created(), Revision::new(5, 0));
    assert_eq!(gens[1].to_ver(), 1);
}

#[test]
fn test_key_index_restore() {
    let mut ki = KeyIndex::new("key".as_bytes().to_vec());
    ki.restore(Revision::new(2, 0), Revision::new(5, 1), 3);

    assert_eq!(ki.to_modified(), Revision::new(5, 1));
    let gens = ki.as_generations();
    assert_eq!(gens.len(), 1);
    assert_eq!(gens[0].to_created(), Revision::new(2, 0));
    assert_eq!(gens[0].to_ver(), 3);
    assert_eq!(gens[0].as_revs(), [Revision::new(5, 1)]);

    // restored state continues to grow through put/tombstone.
    ki.put(7, 0);
    ki.tombstone(8, 0).unwrap();
    let gens = ki.as_generations();
    assert_eq!(gens.len(), 2);
    assert_eq!(gens[0].to_ver(), 5);

    let (created, modified, ver) = ki.get(5).unwrap();
    assert_eq!(created, Revision::new(2, 0));
    assert_eq!(modified, Revision::new(5, 1));
    assert_eq!(ver, 3);
}

#[test]
fn test_key_index_get() {
    let mut ki = KeyIndex::new("key".as_bytes().to_vec());
    ki.put(1, 0);
    ki.put(2, 0);
    ki.tombstone(3, 0).unwrap();
    ki.put(5, 0);
    ki.put(6, 0);

    match ki.get(0) {
        Err(Error::KeyNotFound(_, _)) => (),
        res => panic!("unexpected {:?}", res),
    }

    let (created, modified, ver) = ki.get(1).unwrap();
    assert_eq!(
        (created, modified, ver),
        (Revision::new(1, 0), Revision::new(1, 0), 1)
    );

    let (created, modified, ver) = ki.get(2).unwrap();
    assert_eq!(
        (created, modified, ver),
        (Revision::new(1, 0), Revision::new(2, 0), 2)
    );

    // dead at its tombstone revision and in the gap that follows.
    match ki.get(3) {
        Err(Error::KeyNotFound(_, _)) => (),
        res => panic!("unexpected {:?}", res),
    }
    match ki.get(4) {
        Err(Error::KeyNotFound(_, _)) => (),
        res => panic!("unexpected {:?}", res),
    }

    let (created, modified, ver) = ki.get(5).unwrap();
    assert_eq!(
        (created, modified, ver),
        (Revision::new(5, 0), Revision::new(5, 0), 1)
    );

    let (created, modified, ver) = ki.get(100).unwrap();
    assert_eq!(
        (created, modified, ver),
        (Revision::new(5, 0), Revision::new(6, 0), 2)
    );
}

#[test]
fn test_key_index_get_empty() {
    let ki = KeyIndex::new("key".as_bytes().to_vec());
    match ki.get(10) {
        Err(Error::KeyNotFound(_, _)) => (),
        res => panic!("unexpected {:?}", res),
    }
}
