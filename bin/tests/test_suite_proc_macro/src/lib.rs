use quote::{format_ident, quote};

/// Generates one `#[test]` per `.lox` file under `bin/tests/fixtures`, each calling
/// `lox_expect` with the file's contents.
#[proc_macro]
pub fn generate_tests(_: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let root_dir = format!("{}/../fixtures", env!("CARGO_MANIFEST_DIR"));
    let tests = walkdir::WalkDir::new(root_dir.clone())
        .sort_by_file_name()
        .into_iter()
        .flatten()
        .filter(|entry| entry.path().extension() == Some("lox".as_ref()))
        .map(|entry| {
            let test_file_path = entry.path().to_string_lossy();
            let relative_test_path = entry
                .path()
                .strip_prefix(&root_dir)
                .unwrap()
                .with_extension("")
                .to_string_lossy()
                .chars()
                .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
                .collect::<String>();
            let test_ident = format_ident!("test_{}", relative_test_path);
            quote! {
                #[test]
                fn #test_ident() {
                    lox_expect(std::fs::read_to_string(#test_file_path).unwrap().as_str());
                }
            }
        });

    quote! {
        #[ctor::ctor]
        fn init() {
            env_logger::init();
        }

        #(#tests)*
    }.into()
}
