//! End-to-end tests for BIP38 encryption, tokens and multiplied key pairs
//!
//! Scrypt dominates every test here; the workspace builds the KDF crates
//! optimized even in test profiles.

#[cfg(test)]
mod tests {
    use crate::bip38::{
        create_key_pair, create_key_pair_with_confirmation, create_token, create_token_lot,
        decrypt, decrypt_public, encrypt,
    };
    use crate::error::{Error, ParseError};
    use crate::parse::{ParsePrivate, ParsePublic, ParseToken};
    use crate::records::{EncryptedPrivate, EncryptedToken};
    use crate::types::{EK_MAX_LOT, EK_MAX_SEQUENCE};
    use crate::{Bip38Builder, Network, PaymentAddress};
    use assert_matches::assert_matches;
    use hex::FromHex;
    use secp256k1::SecretKey;

    const SEED: [u8; 24] = [
        0xbb, 0xea, 0xc8, 0xb9, 0xbb, 0x39, 0x38, 0x15, 0x20, 0xb6, 0x87, 0x35, 0x53, 0x54, 0x4b,
        0x38, 0x7b, 0xca, 0xa1, 0x91, 0x12, 0x60, 0x22, 0x30,
    ];

    fn secret(hex: &str) -> SecretKey {
        SecretKey::from_slice(&Vec::from_hex(hex).unwrap()).unwrap()
    }

    #[test]
    fn test_encrypt_decrypt_round_trip() {
        let key = secret("0c28fca386c7a227600b2fe50b7cae11ec86d3bf1fbe471be89827e19d72aa1d");

        for (version, compressed) in [(0x00, false), (0x00, true), (0x6f, true), (0xff, false)] {
            let encrypted = encrypt(&key, "MySecretPassword123!", version, compressed).unwrap();
            let parsed = ParsePrivate::parse(&encrypted).unwrap();
            assert!(!parsed.multiplied());
            assert_eq!(parsed.address_version(), version);
            assert_eq!(parsed.compressed(), compressed);

            let decrypted = decrypt(&encrypted, "MySecretPassword123!").unwrap();
            assert_eq!(decrypted.secret, key);
            assert_eq!(decrypted.version, version);
            assert_eq!(decrypted.compressed, compressed);
            assert!(decrypted.address().validate(parsed.salt()));
        }
    }

    #[test]
    fn test_wrong_passphrase() {
        let key = secret("cbf4b9f70470856bb4f40f80b87edb90865997ffee6df315ab166d713af433a5");
        let encrypted = encrypt(&key, "correct", 0x00, false).unwrap();

        assert_matches!(decrypt(&encrypted, "incorrect"), Err(Error::PassphraseMismatch));
        assert_matches!(encrypted.decrypt(""), Err(Error::PassphraseMismatch));
    }

    #[test]
    fn test_passphrase_is_normalized() {
        let key = secret("64eeab5f9be2a01a8365a579511eb3373c87c40da6d2a25f05bda68fe077b66e");
        let decomposed = "\u{03d2}\u{0301}";
        let composed = "\u{03d3}";

        let encrypted = encrypt(&key, decomposed, 0x00, true).unwrap();
        assert_eq!(decrypt(&encrypted, composed).unwrap().secret, key);
    }

    #[test]
    fn test_corrupted_key_is_rejected_before_decryption() {
        let encrypted = EncryptedPrivate::from_base58(
            "6PRVWUbkzzsbcVac2qwfssoUJAN1Xhrg6bNk8J7Nzm5H7kxEbn2Nh2ZoGg",
        )
        .unwrap();
        let mut bytes = encrypted.to_byte_array();
        bytes[20] ^= 0x01;

        assert_matches!(
            decrypt(&EncryptedPrivate::from_byte_array(bytes), "TestingOneTwoThree"),
            Err(Error::Parse(ParseError::InvalidChecksum))
        );
    }

    #[test]
    fn test_token_key_pair_round_trip() {
        let token = create_token("owner passphrase", &[0x01, 0x23, 0x45, 0x67, 0x89, 0xab, 0xcd, 0xef])
            .unwrap();
        let parsed = ParseToken::parse(&token).unwrap();
        assert!(!parsed.lot_sequence());

        for (version, compressed) in [(0x00, false), (0x00, true), (0x6f, true)] {
            let pair = create_key_pair_with_confirmation(&token, &SEED, version, compressed).unwrap();

            let private = ParsePrivate::parse(&pair.private).unwrap();
            assert!(private.multiplied());
            assert_eq!(private.compressed(), compressed);
            assert_eq!(private.address_version(), version);
            assert_eq!(private.entropy(), parsed.entropy());

            let decrypted = decrypt(&pair.private, "owner passphrase").unwrap();
            let address = PaymentAddress::from_secret(&decrypted.secret, version, compressed);
            assert_eq!(address, PaymentAddress::from_point(&pair.point, version, compressed));

            let confirmed = decrypt_public(&pair.public, "owner passphrase").unwrap();
            assert_eq!(confirmed.point, pair.point);
            assert_eq!(confirmed.address(), address);

            assert_matches!(decrypt(&pair.private, "someone else"), Err(Error::PassphraseMismatch));
            assert_matches!(
                decrypt_public(&pair.public, "someone else"),
                Err(Error::PassphraseMismatch)
            );
        }
    }

    #[test]
    fn test_lot_sequence_token_key_pair_round_trip() {
        let token = create_token_lot("lot owner", &[0xde, 0xad, 0xbe, 0xef], 7, 4095).unwrap();
        let pair = create_key_pair_with_confirmation(&token, &SEED, 0x00, false).unwrap();

        let private = ParsePrivate::parse(&pair.private).unwrap();
        assert!(private.lot_sequence());
        assert_eq!(private.key_fields().lot_and_sequence(), Some((7, 4095)));
        assert_eq!(private.owner_salt(), &[0xde, 0xad, 0xbe, 0xef]);

        let public = ParsePublic::parse(&pair.public).unwrap();
        assert_eq!(public.flags(), private.flags());
        assert_eq!(public.salt(), private.salt());

        let decrypted = decrypt(&pair.private, "lot owner").unwrap();
        assert_eq!(decrypted.address(), PaymentAddress::from_point(&pair.point, 0x00, false));
        assert_eq!(decrypt_public(&pair.public, "lot owner").unwrap().point, pair.point);
    }

    #[test]
    fn test_key_pair_matches_confirmed_key_pair() {
        let token = EncryptedToken::from_base58(
            "passphraseouGLY8yjTZQ5Q2bTo8rtKfdbHz4tme7QuPheRgES8KnT6pX5yxFauYhv3SVPDD",
        )
        .unwrap();

        let pair = create_key_pair(&token, &SEED, 0x00, true).unwrap();
        let confirmed = token.key_pair(&SEED, 0x00, true).unwrap();
        assert_eq!(pair.private, confirmed.private);
        assert_eq!(pair.point, confirmed.point);
    }

    #[test]
    fn test_lot_sequence_boundaries() {
        let salt = [0xba, 0xad, 0xf0, 0x0d];

        assert!(create_token_lot("", &salt, EK_MAX_LOT, EK_MAX_SEQUENCE).is_ok());
        assert_matches!(
            create_token_lot("", &salt, EK_MAX_LOT + 1, 0),
            Err(Error::LotSequenceOutOfRange {
                lot: 0x100000,
                sequence: 0
            })
        );
        assert_matches!(
            create_token_lot("", &salt, 0, EK_MAX_SEQUENCE + 1),
            Err(Error::LotSequenceOutOfRange {
                lot: 0,
                sequence: 0x1000
            })
        );
    }

    #[test]
    fn test_key_pair_rejects_corrupt_token() {
        let token = EncryptedToken::from_base58(
            "passphraseo59BauW85etaRsKpbbTrEa5RRYw6bq5K9yrDf4r4N5fcirPdtDKmfJw9oYNoGN",
        )
        .unwrap();

        assert_matches!(
            create_key_pair(&token, &SEED, 0x00, false),
            Err(Error::Parse(ParseError::InvalidChecksum))
        );
    }

    #[test]
    fn test_builder_encrypts_for_network() {
        let key = secret("cbf4b9f70470856bb4f40f80b87edb90865997ffee6df315ab166d713af433a5");
        let builder = Bip38Builder::new().passphrase("TestingOneTwoThree").network(Network::Testnet);

        let encrypted = builder.encrypt(&key).unwrap();
        let decrypted = encrypted.decrypt("TestingOneTwoThree").unwrap();
        assert_eq!(decrypted.secret, key);
        assert_eq!(decrypted.network(), Some(Network::Testnet));
        assert!(decrypted.address().to_string().starts_with(['m', 'n']));
    }

    #[cfg(feature = "rand")]
    #[test]
    fn test_generated_key_pair_round_trip() {
        use crate::bip38::{generate_key_pair, generate_token_lot};

        let token = generate_token_lot("generated", 1, 2).unwrap();
        assert_eq!(ParseToken::parse(&token).unwrap().lot_and_sequence(), Some((1, 2)));

        let pair = generate_key_pair(&token, 0x00, true).unwrap();
        let decrypted = decrypt(&pair.private, "generated").unwrap();
        assert_eq!(decrypted.address(), PaymentAddress::from_point(&pair.point, 0x00, true));
    }
}
