use super::*;

#[test]
fn test_thread_sync() {
    let th: Thread<u64, u64> = Thread::new_sync("test-thread-sync", 16, |rx: Rx<u64>| {
        move || {
            let mut acc = 0;
            for msg in rx {
                acc += msg;
            }
            acc
        }
    });
    assert_eq!(th.to_name(), "test-thread-sync");

    let tx = th.to_tx();
    for i in 0..1_000 {
        tx.post(i).unwrap();
    }
    mem::drop(tx);

    assert_eq!(th.join().unwrap(), (0..1_000).sum::<u64>());
}

#[test]
fn test_thread_drop() {
    let th: Thread<u64, u64> = Thread::new_sync("test-thread-drop", 2, |rx: Rx<u64>| {
        move || {
            let mut acc = 0;
            for msg in rx {
                acc += msg;
            }
            acc
        }
    });

    let tx = th.to_tx();
    tx.post(10).unwrap();
    mem::drop(tx);
    mem::drop(th); // shall join the thread routine.
}
