use shade_account::{PrivateKey, PublicKey, hex0x};
use shade_privacy::{
    HashPath, MockProver, Note, NoteProver, ProofInputAssembler, ProofInputVector, SiblingPair,
    encode_leaf_index,
};
use shade_transaction::AssetId;

fn settled_note(index: u64, depth: usize) -> Note {
    let levels = (0..depth)
        .map(|l| SiblingPair::new([l as u8; 32], [0x80 | l as u8; 32]))
        .collect();
    Note::pending(AssetId(0), 5_000, PublicKey([9u8; 32]), [0x5e; 32], [0xc0; 32])
        .with_settlement(index, HashPath::new(levels))
}

#[tokio::test]
async fn echoed_index_and_root_match() {
    let note = settled_note(11, 32);
    let root = [0x42u8; 32];
    let key = PrivateKey::from_bytes([0x11; 32]);

    let inputs = ProofInputAssembler::new(32)
        .assemble_for_note(&note, &key, &root)
        .unwrap();

    let prover = MockProver::new();
    let artifact = prover
        .create_proof("note_membership", &inputs.to_prover_args(), 1 << 19)
        .await
        .unwrap();
    assert!(prover.verify_proof(&artifact.verifier, &artifact.proof).await.unwrap());

    let echoed = MockProver::echoed_inputs(&artifact.proof).unwrap();
    let echoed = ProofInputVector::from_prover_args(&echoed).unwrap();
    assert_eq!(echoed.leaf_index, encode_leaf_index(11));
    assert_eq!(echoed.tree_root, hex0x::encode(root));
    assert_eq!(echoed, inputs);
}

#[tokio::test]
async fn raw_path_from_ledger_bytes() {
    let note = settled_note(3, 4);
    let raw = note.hash_path.as_ref().unwrap().to_bytes();
    let decoded = HashPath::from_bytes(&raw).unwrap();

    let key = PrivateKey::from_bytes([1; 32]);
    let from_raw = ProofInputAssembler::new(4)
        .assemble(Some(3), Some(&decoded), &key, &[0; 32], &note.secret, &note.commitment)
        .unwrap();
    let from_note = ProofInputAssembler::new(4)
        .assemble_for_note(&note, &key, &[0; 32])
        .unwrap();
    assert_eq!(from_raw, from_note);

    // 3 = 0b0011: left, left, right, right
    assert_eq!(
        from_raw.siblings,
        vec![
            hex0x::encode([0u8; 32]),
            hex0x::encode([1u8; 32]),
            hex0x::encode([0x82u8; 32]),
            hex0x::encode([0x83u8; 32]),
        ]
    );
}
