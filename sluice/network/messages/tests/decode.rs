use ethsign::SecretKey;
use serde_json::json;
use sluice_network_messages::{
	decode::MessageDecoder,
	errors::MessageError,
	messages::{
		locked_transfer_signed_from_message,
		message_from_send_event,
		Delivered,
		Lock,
		LockExpired,
		LockedTransfer,
		Message,
		Ping,
		Pong,
		Processed,
		RefundTransfer,
		RequestMonitoring,
		RevealSecret,
		SecretRequest,
		SignedEnvelopeMessage,
		SignedMessage,
		ToDevice,
		Unlock,
		UpdatePFS,
	},
};
use sluice_primitives::{
	constants::{
		EMPTY_SIGNATURE,
		PROTOCOL_VERSION,
	},
	hashing::{
		hash_balance_data,
		hash_secret,
	},
	packing::pack_balance_proof,
	signing::PrivateKey,
	traits::ToBytes,
	types::{
		Address,
		BlockExpiration,
		Bytes,
		CanonicalIdentifier,
		ChainID,
		ChannelIdentifier,
		FeeAmount,
		Locksroot,
		MessageTypeId,
		Nonce,
		PaymentIdentifier,
		SecretHash,
		TokenAmount,
		H256,
		U256,
	},
};
use sluice_state_machine::types::{
	BalanceProofUnsignedState,
	HashTimeLockState,
	LockedTransferUnsignedState,
	SendLockedTransfer,
	SendMessageEvent,
	SendMessageEventInner,
	SendProcessed,
	SendSecretReveal,
};
use web3::signing::{
	keccak256,
	Key,
};

pub enum Keyring {
	Alice,
	Bob,
}

impl Keyring {
	fn private_key(&self) -> PrivateKey {
		let mut secret: [u8; 32] = [0; 32];
		let s = match self {
			Self::Alice => b"ALICE".as_slice(),
			Self::Bob => b"BOB".as_slice(),
		};
		secret[..s.len()].copy_from_slice(s);
		PrivateKey::new(
			SecretKey::from_raw(&secret).expect("Private key generation should not fail"),
		)
	}

	fn address(&self) -> Address {
		self.private_key().address()
	}
}

fn canonical_identifier() -> CanonicalIdentifier {
	CanonicalIdentifier {
		chain_identifier: ChainID::Mainnet,
		token_network_address: Address::from_slice(&[0x0fu8; 20]),
		channel_identifier: ChannelIdentifier::from(277),
	}
}

fn make_locked_transfer() -> LockedTransfer {
	LockedTransfer {
		message_identifier: 123456,
		payment_identifier: PaymentIdentifier::from(1u64),
		chain_id: ChainID::Mainnet,
		token_network_address: Address::from_slice(&[0x0fu8; 20]),
		channel_identifier: ChannelIdentifier::from(277),
		transferred_amount: TokenAmount::from(0),
		locked_amount: TokenAmount::from(10),
		locksroot: Locksroot::from([0x11u8; 32]),
		token: Address::from_slice(&[0x21u8; 20]),
		recipient: Keyring::Bob.address(),
		lock: Lock {
			amount: TokenAmount::from(10),
			expiration: BlockExpiration::from(50u64),
			secrethash: SecretHash::from([0x22u8; 32]),
		},
		target: Address::from_slice(&[0x31u8; 20]),
		initiator: Keyring::Alice.address(),
		fee: FeeAmount::zero(),
		nonce: Nonce::from(1u64),
		signature: EMPTY_SIGNATURE.clone(),
	}
}

fn make_unlock() -> Unlock {
	Unlock {
		message_identifier: 7777,
		payment_identifier: PaymentIdentifier::from(1u64),
		chain_id: ChainID::Mainnet,
		token_network_address: Address::zero(),
		channel_identifier: ChannelIdentifier::zero(),
		transferred_amount: TokenAmount::zero(),
		locked_amount: TokenAmount::zero(),
		locksroot: Locksroot::zero(),
		nonce: Nonce::from(1u64),
		secret: Bytes(vec![0x01; 32]),
		signature: EMPTY_SIGNATURE.clone(),
	}
}

#[test]
fn test_ping_round_trip() {
	let mut ping = Ping {
		nonce: Nonce::from(7u64),
		current_protocol_version: PROTOCOL_VERSION,
		signature: EMPTY_SIGNATURE.clone(),
	};
	ping.sign(Keyring::Alice.private_key()).expect("Ping should be signed");

	let encoded = ping.encode();
	assert_eq!(encoded.len(), 75);
	assert_eq!(encoded[0], 1);

	let decoded = match MessageDecoder::decode(&encoded).expect("Ping should decode") {
		Message::Ping(inner) => inner,
		_ => panic!("Expected a Ping message"),
	};
	assert_eq!(decoded, ping);
	assert_eq!(decoded.sender(), Some(Keyring::Alice.address()));
}

#[test]
fn test_processed_round_trip() {
	let mut processed =
		Processed { message_identifier: 42, signature: EMPTY_SIGNATURE.clone() };
	processed.sign(Keyring::Alice.private_key()).expect("Processed should be signed");

	let decoded = match MessageDecoder::decode(&processed.encode()).expect("Should decode") {
		Message::Processed(inner) => inner,
		_ => panic!("Expected a Processed message"),
	};
	assert_eq!(decoded.message_identifier, 42);
	assert_eq!(decoded.sender(), Some(Keyring::Alice.address()));
}

#[test]
fn test_control_messages_round_trip() {
	let pong = Pong { nonce: Nonce::from(9u64), signature: EMPTY_SIGNATURE.clone() };
	let delivered =
		Delivered { delivered_message_identifier: 99, signature: EMPTY_SIGNATURE.clone() };
	let to_device = ToDevice { message_identifier: 55, signature: EMPTY_SIGNATURE.clone() };

	assert_eq!(Pong::decode(&pong.encode()).expect("Should decode"), pong);
	assert_eq!(Delivered::decode(&delivered.encode()).expect("Should decode"), delivered);
	assert_eq!(ToDevice::decode(&to_device.encode()).expect("Should decode"), to_device);
}

#[test]
fn test_secret_request_round_trip() {
	let mut secret_request = SecretRequest {
		message_identifier: 13,
		payment_identifier: PaymentIdentifier::from(88u64),
		secrethash: SecretHash::from([0x07u8; 32]),
		amount: TokenAmount::from(1000),
		expiration: BlockExpiration::from(700u64),
		signature: EMPTY_SIGNATURE.clone(),
	};
	secret_request.sign(Keyring::Bob.private_key()).expect("SecretRequest should be signed");

	let decoded = match MessageDecoder::decode(&secret_request.encode()).expect("Should decode") {
		Message::SecretRequest(inner) => inner,
		_ => panic!("Expected a SecretRequest message"),
	};
	assert_eq!(decoded, secret_request);
	assert_eq!(decoded.sender(), Some(Keyring::Bob.address()));
}

#[test]
fn test_reveal_secret_round_trip() {
	let secret = Bytes(vec![0x2au8; 32]);
	let mut reveal =
		RevealSecret { message_identifier: 5, secret: secret.clone(), signature: EMPTY_SIGNATURE.clone() };
	reveal.sign(Keyring::Alice.private_key()).expect("RevealSecret should be signed");

	assert_eq!(reveal.secrethash(), hash_secret(&secret.0));

	let decoded = match MessageDecoder::decode(&reveal.encode()).expect("Should decode") {
		Message::RevealSecret(inner) => inner,
		_ => panic!("Expected a RevealSecret message"),
	};
	assert_eq!(decoded, reveal);
}

#[test]
fn test_unlock_envelope_signing() {
	let mut unlock = make_unlock();
	unlock.sign(Keyring::Alice.private_key()).expect("Unlock should be signed");

	assert_eq!(unlock.secrethash(), hash_secret(&[0x01; 32]));
	assert_eq!(unlock.sender(), Some(Keyring::Alice.address()));

	// the signature commits to the on-chain packing, not the wire prefix
	let expected = pack_balance_proof(
		Nonce::from(1u64),
		hash_balance_data(TokenAmount::zero(), TokenAmount::zero(), Locksroot::zero()),
		unlock.message_hash(),
		CanonicalIdentifier {
			chain_identifier: ChainID::Mainnet,
			token_network_address: Address::zero(),
			channel_identifier: ChannelIdentifier::zero(),
		},
		MessageTypeId::BalanceProof,
	);
	assert_eq!(unlock.bytes_to_sign(), expected.0);

	// and the expansion itself, byte for byte
	let mut manual = Address::zero().as_bytes().to_vec();
	manual.extend(U256::from(1).to_bytes()); // chain id
	manual.extend(U256::from(1).to_bytes()); // message type
	manual.extend(U256::zero().to_bytes()); // channel identifier
	manual.extend([0u8; 32]); // empty balance hash
	manual.extend(U256::from(1).to_bytes()); // nonce
	manual.extend(unlock.message_hash().as_bytes());
	assert_eq!(unlock.bytes_to_sign(), manual);

	let decoded = match MessageDecoder::decode(&unlock.encode()).expect("Should decode") {
		Message::Unlock(inner) => inner,
		_ => panic!("Expected an Unlock message"),
	};
	assert_eq!(decoded, unlock);
}

#[test]
fn test_envelope_rejects_zero_nonce() {
	let mut unlock = make_unlock();
	unlock.nonce = Nonce::zero();
	assert!(matches!(
		MessageDecoder::decode(&unlock.encode()),
		Err(MessageError::InvalidValue(_))
	));
}

#[test]
fn test_lock_canonical_bytes() {
	let lock = Lock {
		amount: TokenAmount::from(100),
		expiration: BlockExpiration::from(50u64),
		secrethash: SecretHash::from([0x09u8; 32]),
	};

	let as_bytes = lock.as_bytes();
	assert_eq!(as_bytes.len(), 96);
	assert_eq!(&as_bytes[..32], &U256::from(100).to_bytes()[..]);
	assert_eq!(&as_bytes[32..64], &BlockExpiration::from(50u64).to_be_bytes()[..]);
	assert_eq!(&as_bytes[64..], &[0x09u8; 32]);

	assert_eq!(lock.lockhash(), H256::from(keccak256(&as_bytes)));
	assert_eq!(Lock::from_bytes(&as_bytes).expect("Lock should decode"), lock);
}

#[test]
fn test_locked_transfer_round_trip() {
	let mut transfer = make_locked_transfer();
	transfer.sign(Keyring::Alice.private_key()).expect("LockedTransfer should be signed");

	let encoded = transfer.encode();
	assert_eq!(encoded.len(), LockedTransfer::SIZE);

	let decoded = match MessageDecoder::decode(&encoded).expect("Should decode") {
		Message::LockedTransfer(inner) => inner,
		_ => panic!("Expected a LockedTransfer message"),
	};
	assert_eq!(decoded, transfer);
	assert_eq!(decoded.sender(), Some(Keyring::Alice.address()));
}

#[test]
fn test_refund_transfer_shares_layout_under_own_cmdid() {
	let locked = make_locked_transfer();
	let refund = RefundTransfer {
		message_identifier: locked.message_identifier,
		payment_identifier: locked.payment_identifier,
		chain_id: locked.chain_id,
		token_network_address: locked.token_network_address,
		channel_identifier: locked.channel_identifier,
		transferred_amount: locked.transferred_amount,
		locked_amount: locked.locked_amount,
		locksroot: locked.locksroot,
		token: locked.token,
		recipient: locked.recipient,
		lock: locked.lock.clone(),
		target: locked.target,
		initiator: locked.initiator,
		fee: locked.fee,
		nonce: locked.nonce,
		signature: locked.signature.clone(),
	};

	let locked_encoded = locked.encode();
	let refund_encoded = refund.encode();
	assert_eq!(locked_encoded.len(), refund_encoded.len());
	assert_eq!(locked_encoded[0], 7);
	assert_eq!(refund_encoded[0], 8);
	assert_eq!(&locked_encoded[1..], &refund_encoded[1..]);

	match MessageDecoder::decode(&refund_encoded).expect("Should decode") {
		Message::RefundTransfer(inner) => assert_eq!(inner, refund),
		_ => panic!("Expected a RefundTransfer message"),
	}
	assert!(LockedTransfer::decode(&refund_encoded).is_err());
}

#[test]
fn test_lock_expired_round_trip() {
	let mut lock_expired = LockExpired {
		message_identifier: 31,
		chain_id: ChainID::Mainnet,
		token_network_address: Address::from_slice(&[0x0fu8; 20]),
		channel_identifier: ChannelIdentifier::from(277),
		transferred_amount: TokenAmount::from(1),
		locked_amount: TokenAmount::zero(),
		locksroot: Locksroot::from([0x13u8; 32]),
		nonce: Nonce::from(2u64),
		recipient: Keyring::Bob.address(),
		secrethash: SecretHash::from([0x23u8; 32]),
		signature: EMPTY_SIGNATURE.clone(),
	};
	lock_expired.sign(Keyring::Alice.private_key()).expect("LockExpired should be signed");

	let decoded = match MessageDecoder::decode(&lock_expired.encode()).expect("Should decode") {
		Message::LockExpired(inner) => inner,
		_ => panic!("Expected a LockExpired message"),
	};
	assert_eq!(decoded, lock_expired);
	assert_eq!(decoded.sender(), Some(Keyring::Alice.address()));
}

#[test]
fn test_message_hash_ignores_signature_full_hash_does_not() {
	let mut transfer = make_locked_transfer();
	let unsigned_message_hash = transfer.message_hash();
	let unsigned_hash = transfer.hash();

	transfer.sign(Keyring::Alice.private_key()).expect("LockedTransfer should be signed");

	assert_eq!(transfer.message_hash(), unsigned_message_hash);
	assert_ne!(transfer.hash(), unsigned_hash);

	// flipping a payload byte moves both hashes
	let mut tampered = transfer.clone();
	tampered.locked_amount = TokenAmount::from(11);
	assert_ne!(tampered.message_hash(), transfer.message_hash());
	assert_ne!(tampered.hash(), transfer.hash());
}

#[test]
fn test_decode_unknown_cmdid() {
	let data = vec![0xaau8; 75];
	assert!(matches!(MessageDecoder::decode(&data), Err(MessageError::UnknownCmdId(0xaa))));
}

#[test]
fn test_decode_rejects_bad_framing() {
	let ping = Ping {
		nonce: Nonce::from(7u64),
		current_protocol_version: PROTOCOL_VERSION,
		signature: EMPTY_SIGNATURE.clone(),
	};
	let encoded = ping.encode();

	assert!(MessageDecoder::decode(&encoded[..encoded.len() - 1]).is_err());

	let mut trailing = encoded;
	trailing.push(0);
	assert!(MessageDecoder::decode(&trailing).is_err());

	assert!(MessageDecoder::decode(&[]).is_err());
}

#[test]
fn test_structured_round_trip_and_secret_alias() {
	let unlock = make_unlock();

	let value = serde_json::to_value(Message::Unlock(unlock.clone()))
		.expect("Message should serialize");
	assert_eq!(value.get("type").and_then(|v| v.as_str()), Some("Unlock"));

	let from_unlock_tag = MessageDecoder::from_json(value.clone()).expect("Should deserialize");

	let mut aliased = value;
	aliased["type"] = json!("Secret");
	let from_secret_tag = MessageDecoder::from_json(aliased).expect("Should deserialize");

	assert_eq!(from_unlock_tag, from_secret_tag);
	assert_eq!(from_unlock_tag, Message::Unlock(unlock));
}

#[test]
fn test_structured_rejects_unknown_or_missing_type() {
	assert!(matches!(
		MessageDecoder::from_json(json!({"type": "Gossip"})),
		Err(MessageError::UnknownType(_))
	));
	assert!(matches!(
		MessageDecoder::from_json(json!({"nonce": "1"})),
		Err(MessageError::InvalidData(_))
	));
}

#[test]
fn test_message_from_send_event() {
	let inner = SendMessageEventInner {
		recipient: Keyring::Bob.address(),
		canonical_identifier: canonical_identifier(),
		message_identifier: 800,
	};

	let processed = message_from_send_event(SendMessageEvent::SendProcessed(SendProcessed {
		inner: inner.clone(),
	}));
	match processed {
		Message::Processed(message) => {
			assert_eq!(message.message_identifier, 800);
			assert_eq!(message.signature, *EMPTY_SIGNATURE);
		},
		_ => panic!("Expected a Processed message"),
	}

	let (secret, secrethash) = (Bytes(vec![0x44u8; 32]), hash_secret(&[0x44u8; 32]));
	let reveal = message_from_send_event(SendMessageEvent::SendSecretReveal(SendSecretReveal {
		inner: inner.clone(),
		secret: secret.clone(),
		secrethash,
	}));
	match reveal {
		Message::RevealSecret(message) => {
			assert_eq!(message.secret, secret);
			assert_eq!(message.signature, *EMPTY_SIGNATURE);
		},
		_ => panic!("Expected a RevealSecret message"),
	}

	let balance_proof = BalanceProofUnsignedState::new(
		Nonce::from(1u64),
		TokenAmount::zero(),
		TokenAmount::from(10),
		Locksroot::from([0x11u8; 32]),
		canonical_identifier(),
	)
	.expect("Balance proof values should be valid");
	let transfer_event = SendLockedTransfer {
		inner,
		transfer: LockedTransferUnsignedState {
			payment_identifier: PaymentIdentifier::from(1u64),
			token: Address::from_slice(&[0x21u8; 20]),
			balance_proof,
			lock: HashTimeLockState::create(
				TokenAmount::from(10),
				BlockExpiration::from(50u64),
				SecretHash::from([0x22u8; 32]),
			),
			initiator: Keyring::Alice.address(),
			target: Address::from_slice(&[0x31u8; 20]),
		},
	};
	let locked_transfer =
		message_from_send_event(SendMessageEvent::SendLockedTransfer(transfer_event));
	match locked_transfer {
		Message::LockedTransfer(message) => {
			assert_eq!(message.recipient, Keyring::Bob.address());
			assert_eq!(message.fee, FeeAmount::zero());
			assert_eq!(message.signature, *EMPTY_SIGNATURE);
			assert_eq!(message.lock.amount, TokenAmount::from(10));
		},
		_ => panic!("Expected a LockedTransfer message"),
	}
}

#[test]
fn test_locked_transfer_signed_from_message() {
	let mut transfer = make_locked_transfer();
	transfer.sign(Keyring::Alice.private_key()).expect("LockedTransfer should be signed");

	let state = locked_transfer_signed_from_message(&transfer)
		.expect("Signed transfer should lift into state");

	assert_eq!(state.balance_proof.sender, Keyring::Alice.address());
	assert_eq!(state.balance_proof.nonce, transfer.nonce);
	assert_eq!(state.balance_proof.message_hash, transfer.message_hash());
	assert_eq!(state.lock.encoded.0, transfer.lock.as_bytes());
	assert_eq!(state.message_identifier, transfer.message_identifier);
	assert_eq!(state.initiator, transfer.initiator);
	assert_eq!(state.target, transfer.target);

	let unsigned = make_locked_transfer();
	assert!(matches!(
		locked_transfer_signed_from_message(&unsigned),
		Err(MessageError::InvalidSignature)
	));
}

#[test]
fn test_request_monitoring_verification() {
	// the partner signs a transfer, this node lifts the balance proof out
	// of it and wraps it into a monitoring request
	let mut transfer = make_locked_transfer();
	transfer.sign(Keyring::Bob.private_key()).expect("LockedTransfer should be signed");
	let state = locked_transfer_signed_from_message(&transfer)
		.expect("Signed transfer should lift into state");

	let mut request =
		RequestMonitoring::from_balance_proof_signed_state(&state.balance_proof, TokenAmount::from(10))
			.expect("Balance proof should convert");

	assert!(matches!(request.encode(), Err(MessageError::MissingSignature)));

	request.sign(Keyring::Alice.private_key()).expect("RequestMonitoring should be signed");

	assert!(request.verify_request_monitoring(Keyring::Bob.address(), Keyring::Alice.address()));
	assert!(!request.verify_request_monitoring(Keyring::Alice.address(), Keyring::Alice.address()));

	// flipping any of the three signatures must break verification
	let mut tampered = request.clone();
	tampered.balance_proof.signature.0[10] ^= 0x01;
	assert!(!tampered.verify_request_monitoring(Keyring::Bob.address(), Keyring::Alice.address()));

	let mut tampered = request.clone();
	tampered.non_closing_signature.0[10] ^= 0x01;
	assert!(!tampered.verify_request_monitoring(Keyring::Bob.address(), Keyring::Alice.address()));

	let mut tampered = request.clone();
	tampered.signature.0[10] ^= 0x01;
	assert!(!tampered.verify_request_monitoring(Keyring::Bob.address(), Keyring::Alice.address()));

	// a fully signed request packs and round-trips
	let encoded = request.encode().expect("Signed request should encode");
	assert_eq!(encoded.len(), RequestMonitoring::SIZE);
	assert_eq!(RequestMonitoring::decode(&encoded).expect("Should decode"), request);
}

#[test]
fn test_update_pfs_round_trip() {
	let mut update = UpdatePFS {
		canonical_identifier: canonical_identifier(),
		updating_participant: Keyring::Alice.address(),
		other_participant: Keyring::Bob.address(),
		updating_nonce: Nonce::from(3u64),
		other_nonce: Nonce::from(4u64),
		updating_capacity: TokenAmount::from(90),
		other_capacity: TokenAmount::from(110),
		reveal_timeout: BlockExpiration::from(50u64),
		mediation_fee: FeeAmount::from(2),
		signature: EMPTY_SIGNATURE.clone(),
	};
	update.sign(Keyring::Alice.private_key()).expect("UpdatePFS should be signed");

	let decoded = UpdatePFS::decode(&update.encode()).expect("Should decode");
	assert_eq!(decoded, update);
	// both capacities carry their own value across the wire
	assert_eq!(decoded.updating_capacity, TokenAmount::from(90));
	assert_eq!(decoded.other_capacity, TokenAmount::from(110));
	assert_eq!(decoded.sender(), Some(Keyring::Alice.address()));
}
