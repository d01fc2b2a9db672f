use beatlane_core::input::events::KeyEvent;
use beatlane_core::input::InputQueue;
use std::thread;

#[test]
fn test_input_queue_transmission() {
    let queue = InputQueue::new();
    let sender = queue.sender();

    // Spawn a producer thread
    let handle = thread::spawn(move || {
        sender.send(KeyEvent::down("KeyD")).unwrap();
        sender.send(KeyEvent::up("KeyD")).unwrap();
    });

    handle.join().unwrap();

    let received1 = queue.pop().expect("Should receive first event");
    assert_eq!(received1.code.as_str(), "KeyD");
    assert!(received1.pressed);

    let received2 = queue.pop().expect("Should receive second event");
    assert!(!received2.pressed);

    assert!(queue.pop().is_none());
}

#[test]
fn test_input_queue_drain_preserves_order() {
    let queue = InputQueue::new();

    queue.push(KeyEvent::down("KeyD"));
    queue.push(KeyEvent::down("KeyF"));
    queue.push(KeyEvent::down("KeyJ"));

    let events = queue.drain();
    let codes: Vec<&str> = events.iter().map(|e| e.code.as_str()).collect();
    assert_eq!(codes, ["KeyD", "KeyF", "KeyJ"]);
    assert!(queue.drain().is_empty());
}
