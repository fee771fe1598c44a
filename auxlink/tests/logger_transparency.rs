//! The logging channel must never change what the wrapped bus reports.

use auxlink::{
    mailbox, Action, AuxBus, LoggingChannel, LogicalOutcome, RetryingChannel, TransactionType,
};
use auxlink_test_support::{MemoryBus, RecordingSink, Reply, ScriptedBus};

fn scripted(replies: &[Reply]) -> ScriptedBus {
    ScriptedBus::new(16).with_replies(replies.iter().copied())
}

#[test]
fn test_transfers_match_unwrapped_bus() {
    let script = [
        Reply::ack(),
        Reply::partial(3),
        Reply::partial(0),
        Reply::defer(),
        Reply::nack(),
        Reply::failure(0),
        Reply::failure(5),
        Reply::partial(200),
    ];
    let addresses = [
        0x0000,
        mailbox::DOWN_REQ,
        mailbox::UP_REP,
        mailbox::DOWN_REP,
        mailbox::UP_REQ,
        0x2200,
    ];
    let actions = [Action::Read, Action::Write, Action::WriteStatusUpdateRequest];
    let kinds = [TransactionType::Native, TransactionType::I2c, TransactionType::I2cMot];

    for &address in &addresses {
        for &action in &actions {
            for &kind in &kinds {
                let mut plain = scripted(&script);
                let mut logged = LoggingChannel::with_sink(scripted(&script), RecordingSink::new());

                for _ in 0..script.len() {
                    let mut a = [0x3Cu8; 8];
                    let mut b = [0x3Cu8; 8];
                    let expected = plain.transaction(action, kind, address, &mut a);
                    let actual = logged.transaction(action, kind, address, &mut b);
                    assert_eq!(actual, expected, "{:?} {:?} {:#x}", action, kind, address);
                    assert_eq!(a, b);
                }
            }
        }
    }
}

#[test]
fn test_malformed_mailbox_payloads_pass_through() {
    let payloads: [&[u8]; 5] = [&[0x00], &[0xF0], &[0xFF; 16], &[0x10, 0xFF], &[0x5A, 0x5A, 0x5A]];

    for payload in payloads {
        let mut bus = MemoryBus::new(16);
        bus.load(mailbox::DOWN_REP, payload);
        let mut logged = LoggingChannel::with_sink(&mut bus, RecordingSink::new());

        let mut buf = vec![0u8; payload.len()];
        let transfer = logged.transaction(
            Action::Read,
            TransactionType::Native,
            mailbox::DOWN_REP,
            &mut buf,
        );
        assert_eq!(transfer.completed, payload.len());
        assert_eq!(&buf[..], payload);
    }
}

#[test]
fn test_one_line_per_physical_transaction() {
    let mut bus = ScriptedBus::new(16).with_replies([Reply::defer(), Reply::partial(4)]);
    let mut sink = RecordingSink::new();
    {
        let logged = LoggingChannel::with_sink(&mut bus, &mut sink);
        let mut channel = RetryingChannel::new(logged).unwrap();
        let mut buf = [0u8; 20];
        assert_eq!(channel.read(0x0100, &mut buf, 3), LogicalOutcome::Ack);
    }

    // defer, partial, full chunk 1, then chunk 2
    assert_eq!(bus.transaction_count(), 4);
    assert_eq!(sink.lines().len(), 4);
    assert_eq!(sink.lines()[0], "DP-AUX> INCOMPLETE DEFER rd nat 0100h { }");
    assert!(sink.lines()[1].starts_with("DP-AUX> INCOMPLETE ACK rd nat 0100h { a5 a5 a5 a5 }"));
    assert!(sink.lines()[3].starts_with("DP-AUX> ACK rd nat 0110h { a5 a5 a5 a5 }"));
}

#[cfg(any(debug_assertions, feature = "verbose"))]
#[test]
fn test_mailbox_reply_is_decoded() {
    use auxlink::MessageHeader;
    use auxlink_shared::crc4::header_crc4;

    // LCT=1, body 2 bytes, start+end, seq 1, reply to LINK_ADDRESS
    let mut header = [0x10u8, 0x02, 0xD0];
    header[2] |= header_crc4(&header, 5);
    assert!(MessageHeader::decode(&header).is_ok());

    let mut bus = MemoryBus::new(16);
    bus.load(mailbox::DOWN_REP, &header);
    bus.load(mailbox::DOWN_REP + 3, &[0x01, 0x77]);

    let mut logged = LoggingChannel::with_sink(&mut bus, RecordingSink::new());
    let mut buf = [0u8; 5];
    logged.transaction(
        Action::Read,
        TransactionType::Native,
        mailbox::DOWN_REP,
        &mut buf,
    );

    let expected = format!(
        "DP-AUX> ACK rd nat 1400h hint(to:root SE  #1) {{ 10 02 {:02x} | 01 77 }}",
        header[2]
    );
    assert_eq!(logged.sink().last(), Some(expected.as_str()));
}
