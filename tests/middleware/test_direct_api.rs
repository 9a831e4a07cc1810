//! Direct (non-intercepted) encrypt/decrypt entry points used by contract
//! wrappers that bypass the interception layer.

use confidential_rpc::{EncryptionKey, EncryptionMiddleware};

use super::support::{SimulatedNode, StaticResolver};

#[tokio::test]
async fn test_direct_roundtrip() {
    let node = SimulatedNode::new();
    let mw = EncryptionMiddleware::new(StaticResolver(node.public_key()));

    let (envelope, key) = mw.encrypt_data_field(&[0x61, 0xbc, 0x22, 0x1a], None).await.unwrap();

    let (plaintext, sender_pub) = node.decrypt_request(&envelope);
    assert_eq!(plaintext, vec![0x61, 0xbc, 0x22, 0x1a]);

    let response = node.encrypt_response(&sender_pub, &[0x05, 0x0b]);
    let decrypted = mw.decrypt_response(&response, &key).await.unwrap();
    assert_eq!(decrypted, vec![0x05, 0x0b]);

    // the direct path tracks nothing
    assert_eq!(mw.pending_calls().await, 0);
    assert_eq!(mw.marked_payloads().await, 0);
}

#[tokio::test]
async fn test_caller_supplied_key_is_used() {
    let node = SimulatedNode::new();
    let mw = EncryptionMiddleware::new(StaticResolver(node.public_key()));

    let supplied = EncryptionKey::from_bytes([0x11; 32]);
    let (envelope, key) = mw
        .encrypt_data_field(b"payload", Some(supplied))
        .await
        .unwrap();
    assert_eq!(key.as_bytes(), &[0x11; 32]);

    let (plaintext, sender_pub) = node.decrypt_request(&envelope);
    assert_eq!(plaintext, b"payload");

    // decryption works from the bytes alone, as a caller re-deriving the
    // key from its own storage would do
    let response = node.encrypt_response(&sender_pub, b"result");
    let rederived = EncryptionKey::from_bytes([0x11; 32]);
    let decrypted = mw.decrypt_response(&response, &rederived).await.unwrap();
    assert_eq!(decrypted, b"result");
}

#[tokio::test]
async fn test_wrong_key_rejected() {
    let node = SimulatedNode::new();
    let mw = EncryptionMiddleware::new(StaticResolver(node.public_key()));

    let (envelope, _key) = mw.encrypt_data_field(b"payload", None).await.unwrap();
    let (_, sender_pub) = node.decrypt_request(&envelope);
    let response = node.encrypt_response(&sender_pub, b"result");

    let other = EncryptionKey::generate();
    assert!(mw.decrypt_response(&response, &other).await.is_err());
}
