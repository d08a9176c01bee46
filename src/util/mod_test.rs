use super::*;

use crate::mvcc::KeyValue;

#[test]
fn test_cbor_bytes() {
    let kv = KeyValue {
        key: "hello".as_bytes().to_vec(),
        create_revision: 1,
        mod_revision: 5,
        version: 3,
        lease: 0,
        value: "world".as_bytes().to_vec(),
    };

    let data = into_cbor_bytes(kv.clone()).unwrap();
    let (val, n) = from_cbor_bytes::<KeyValue>(&data).unwrap();
    assert_eq!(n, data.len());
    assert_eq!(val, kv);
}
