use kb_navigator::bot::callback::{NavCallback, CALLBACK_DATA_MAX_BYTES};
use proptest::prelude::*;

fn nav_callback() -> impl Strategy<Value = NavCallback> {
    let idx = 0usize..=usize::from(u16::MAX);
    prop_oneof![
        Just(NavCallback::BackMain),
        idx.clone().prop_map(NavCallback::Section),
        (idx.clone(), idx.clone()).prop_map(|(s, t)| NavCallback::Topic(s, t)),
        (idx.clone(), idx.clone(), idx.clone())
            .prop_map(|(s, t, st)| NavCallback::Subtopic(s, t, st)),
        idx.clone().prop_map(NavCallback::BackToTopics),
        (idx.clone(), idx).prop_map(|(s, t)| NavCallback::BackToSubtopics(s, t)),
    ]
}

proptest! {
    /// Arbitrary payloads are either decoded or rejected, never a panic.
    #[test]
    fn decode_does_not_crash(s in "\\PC*") {
        let _ = s.parse::<NavCallback>();
    }

    /// Payloads shaped like navigation data with junk indices are rejected.
    #[test]
    fn rejects_non_numeric_indices(
        kind in "(section|topic|subtopic|back_topic|back_subtopic)",
        junk in "[a-z+\\-][a-z0-9]*"
    ) {
        let data = format!("{kind}_{junk}");
        prop_assert!(data.parse::<NavCallback>().is_err(), "{} was accepted", data);
    }

    /// Everything the bot puts on a button decodes back to the same action.
    #[test]
    fn encoded_callbacks_are_accepted(cb in nav_callback()) {
        let data = cb.encode();
        prop_assert!(data.len() <= CALLBACK_DATA_MAX_BYTES);
        prop_assert_eq!(data.parse::<NavCallback>().ok(), Some(cb));
    }
}
