#[cfg(test)]
mod tests {
    use super::super::validation::{
        normalize_username, validate_bio, validate_deletion_confirmation, validate_email,
        validate_name, validate_password, validate_username, PasswordStrength,
    };

    #[test]
    fn accepts_any_nonempty_name_up_to_fifty_chars() {
        for name in ["A", "Maria Clara", "名前", &"x".repeat(50)] {
            assert!(validate_name(name).is_valid(), "rejected {name:?}");
        }
    }

    #[test]
    fn rejects_empty_and_oversized_names() {
        assert!(!validate_name("").is_valid());
        assert!(!validate_name("   ").is_valid());
        assert!(!validate_name(&"x".repeat(51)).is_valid());
    }

    #[test]
    fn normalization_yields_a_single_leading_marker() {
        for input in ["ada", "@ada", "@@ada", "  @ada  "] {
            let normalized = normalize_username(input);
            assert_eq!(normalized, "@ada");
            // Idempotent: normalizing again changes nothing.
            assert_eq!(normalize_username(&normalized), normalized);
        }
    }

    #[test]
    fn username_body_must_be_three_to_thirty_word_chars() {
        assert!(validate_username("ada_99").is_valid());
        assert!(validate_username("@ada").is_valid());
        assert!(validate_username(&"a".repeat(30)).is_valid());

        assert!(!validate_username("ab").is_valid());
        assert!(!validate_username(&"a".repeat(31)).is_valid());
        assert!(!validate_username("ada lovelace").is_valid());
        assert!(!validate_username("ada-lovelace").is_valid());
        assert!(!validate_username("").is_valid());
    }

    #[test]
    fn bio_allows_empty_but_caps_at_160() {
        assert!(validate_bio("").is_valid());
        assert!(validate_bio(&"b".repeat(160)).is_valid());
        assert!(!validate_bio(&"b".repeat(161)).is_valid());
    }

    #[test]
    fn email_shape_check() {
        assert!(validate_email("ada@example.com").is_valid());
        assert!(validate_email("a.b+c@sub.example.co").is_valid());

        for bad in [
            "not-an-email",
            "@example.com",
            "ada@",
            "ada@example",
            "ada@.com",
            "ada@example..com",
            "a da@example.com",
            "ada@exa@mple.com",
        ] {
            assert!(!validate_email(bad).is_valid(), "accepted {bad:?}");
        }
    }

    #[test]
    fn password_requires_all_five_checks() {
        assert!(validate_password("Passw0rd!").is_valid());

        // Each missing ingredient fails the composite.
        assert!(!validate_password("Pw0rd!").is_valid()); // short
        assert!(!validate_password("passw0rd!").is_valid()); // no uppercase
        assert!(!validate_password("PASSW0RD!").is_valid()); // no lowercase
        assert!(!validate_password("Password!").is_valid()); // no digit
        assert!(!validate_password("Passw0rd1").is_valid()); // no special

        let strength = PasswordStrength::check("passw0rd!");
        assert!(strength.long_enough);
        assert!(!strength.has_uppercase);
        assert!(strength.has_lowercase);
        assert!(strength.has_digit);
        assert!(strength.has_special);
    }

    #[test]
    fn deletion_confirmation_is_exact_and_case_sensitive() {
        assert!(validate_deletion_confirmation("EXCLUIR").is_valid());

        assert!(!validate_deletion_confirmation("excluir").is_valid());
        assert!(!validate_deletion_confirmation("Excluir").is_valid());
        assert!(!validate_deletion_confirmation(" EXCLUIR").is_valid());
        assert!(!validate_deletion_confirmation("EXCLUIR ").is_valid());
        assert!(!validate_deletion_confirmation("").is_valid());
    }
}
