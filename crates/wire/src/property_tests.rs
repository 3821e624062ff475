// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Property tests for protocol serde roundtrips.
//!
//! Covers every variant of Request and Response with generated field
//! values; a frame that encodes must decode to an equal value.

use proptest::prelude::*;

use super::*;

fn arb_names() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec("[a-z][a-z0-9-]{0,12}", 0..4)
}

fn arb_request() -> impl Strategy<Value = Request> {
    prop_oneof![
        arb_names().prop_map(|names| Request::Start { names }),
        arb_names().prop_map(|names| Request::Stop { names }),
        Just(Request::StopAll),
        arb_names().prop_map(|names| Request::Restart { names }),
        Just(Request::RestartAll),
        Just(Request::List),
        Just(Request::Status),
    ]
}

fn arb_response() -> impl Strategy<Value = Response> {
    prop_oneof![
        Just(Response::Ok),
        ".{0,40}".prop_map(|message| Response::Error { message }),
        arb_names().prop_map(|names| Response::List { names }),
        proptest::collection::vec(
            ("[a-z]{1,8}", any::<bool>())
                .prop_map(|(name, running)| ProcStatus { name, running }),
            0..4
        )
        .prop_map(|procs| Response::Status { procs }),
    ]
}

proptest! {
    #[test]
    fn request_roundtrips(request in arb_request()) {
        let encoded = encode(&request).unwrap();
        let decoded: Request = decode(&encoded).unwrap();
        prop_assert_eq!(decoded, request);
    }

    #[test]
    fn response_roundtrips(response in arb_response()) {
        let encoded = encode(&response).unwrap();
        let decoded: Response = decode(&encoded).unwrap();
        prop_assert_eq!(decoded, response);
    }
}

#[test]
fn run_command_names_map_to_requests() {
    let cases = [
        ("start", true),
        ("stop", true),
        ("stop-all", true),
        ("restart", true),
        ("restart-all", true),
        ("list", true),
        ("status", true),
        ("bogus", false),
    ];
    for (name, ok) in cases {
        assert_eq!(Request::from_command(name, vec![]).is_some(), ok, "command {name}");
    }
}
