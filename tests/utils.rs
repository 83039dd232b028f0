use sampledata::utils::stream::RepeatVec;
use sampledata::utils::uuid::UUID;
use futures::prelude::*;

#[test]
pub fn repeat_vec_cycles() {
    let repeated = RepeatVec::<u32, ()>::new(vec![1, 2, 3])
        .take(8)
        .collect()
        .wait()
        .unwrap();
    assert_eq!(repeated, vec![1, 2, 3, 1, 2, 3, 1, 2]);
}

#[test]
pub fn repeat_vec_empty_ends() {
    let repeated = RepeatVec::<u32, ()>::new(vec![])
        .take(3)
        .collect()
        .wait()
        .unwrap();
    assert!(repeated.is_empty());
}

#[test]
pub fn uuid_hyphenated_form() {
    let text = "0f3c2a1b-9d8e-4c7b-a6f5-e4d3c2b1a090";
    let id: UUID = text.parse().unwrap();
    assert_eq!(id.to_string(), text);
    assert_eq!(UUID::nil().to_string(), "00000000-0000-0000-0000-000000000000");
    assert!("not-a-uuid".parse::<UUID>().is_err());
}

#[test]
pub fn random_uuids_are_v4() {
    let a = UUID::rand();
    let b = UUID::rand();
    assert!(a != b);
    assert_eq!(a.as_bytes()[6] >> 4, 4);
}
