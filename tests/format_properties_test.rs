use pos_terminal::domain::format::{format_card_number, format_cvv, format_expiry};
use rand::Rng;

fn random_digits(rng: &mut impl Rng, len: usize) -> String {
    (0..len)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

#[test]
fn test_card_number_never_exceeds_sixteen_digits() {
    let mut rng = rand::thread_rng();

    for _ in 0..500 {
        let len = rng.gen_range(0..40);
        let raw = random_digits(&mut rng, len);

        let formatted = format_card_number(&raw);

        let digits: String = formatted.chars().filter(|c| c.is_ascii_digit()).collect();
        assert_eq!(digits.len(), len.min(16), "input {raw}");
        assert!(raw.starts_with(&digits));
        assert!(formatted.split(' ').all(|group| group.len() <= 4));
        assert!(!formatted.ends_with(' '));
        if len > 16 {
            let groups: Vec<usize> = formatted.split(' ').map(str::len).collect();
            assert_eq!(groups, [4, 4, 4, 4], "input {raw}");
        }
    }
}

#[test]
fn test_formatting_ignores_interleaved_noise() {
    let mut rng = rand::thread_rng();
    let noise = [' ', '-', '/', 'x', '.'];

    for _ in 0..200 {
        let digits = random_digits(&mut rng, 16);
        let noisy: String = digits
            .chars()
            .flat_map(|c| [c, noise[rng.gen_range(0..noise.len())]])
            .collect();

        assert_eq!(format_card_number(&noisy), format_card_number(&digits));
        assert_eq!(format_expiry(&noisy), format_expiry(&digits));
    }
}

#[test]
fn test_expiry_and_cvv_are_bounded() {
    let mut rng = rand::thread_rng();

    for _ in 0..200 {
        let len = rng.gen_range(0..10);
        let raw = random_digits(&mut rng, len);

        assert!(format_expiry(&raw).len() <= 5);
        assert!(format_cvv("", &raw).len() <= 3);
    }
}
