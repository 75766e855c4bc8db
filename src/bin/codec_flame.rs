use prefix_codec::{compress, expand};

fn main() {
    let mut words: Vec<String> = (0..20000)
        .map(|i| format!("{}{:x}", ["pre", "pro", "para", "peri"][i % 4], i * 7919))
        .collect();
    words.sort();

    for _ in 0..200 {
        let blob = compress(&words).unwrap();
        let decoded = expand(&blob).unwrap();
        assert_eq!(decoded.len(), words.len());
    }
}
