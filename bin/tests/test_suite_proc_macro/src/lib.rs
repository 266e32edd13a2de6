use std::path::Path;

use quote::{format_ident, quote};
use syn::{parse_macro_input, LitStr};

/// `generate_tests!("cases")` expands to one `#[test]` per `*.calc` file below
/// `bin/tests/cases`. Every test feeds its file to `calc_expect`.
#[proc_macro]
pub fn generate_tests(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let dir = parse_macro_input!(input as LitStr);
    let cases = Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join(dir.value());
    if !cases.is_dir() {
        let message = format!("no case directory at {}", cases.display());
        return syn::Error::new(dir.span(), message).to_compile_error().into();
    }

    let tests = walkdir::WalkDir::new(&cases)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "calc"))
        .map(|entry| {
            let path = entry.path();
            let name = path.strip_prefix(&cases).unwrap_or(path).with_extension("");
            let ident = format_ident!("cases_{}", name.to_string_lossy().replace(['/', '-', '.'], "_"));
            let file = path.to_string_lossy().into_owned();
            quote! {
                #[test]
                fn #ident() {
                    let source = std::fs::read_to_string(#file).expect("case file is readable");
                    calc_expect(&source);
                }
            }
        });

    quote! {
        #[ctor::ctor]
        fn init_logger() {
            env_logger::init();
        }

        #(#tests)*
    }
    .into()
}
