use proptest::prelude::*;
use pulseprint_core::Printer;
use pulseprint_transfer::{ExportOptions, Exporter, FileFormat, ImportOptions, Importer};

fn printer_strategy() -> impl Strategy<Value = (String, Option<String>, [u8; 4], String)> {
    (
        "[A-Za-z0-9][A-Za-z0-9 ]{0,14}[A-Za-z0-9]",
        proptest::option::of("[A-Z][A-Z0-9]{1,5}"),
        any::<[u8; 4]>(),
        "[a-z0-9]{4,10}",
    )
}

proptest! {
    #[test]
    fn exported_printers_import_unchanged(
        specs in proptest::collection::vec(printer_strategy(), 0..6),
        format in prop::sample::select(FileFormat::ALL.to_vec()),
    ) {
        let printers: Vec<Printer> = specs
            .iter()
            .enumerate()
            .map(|(i, (name, model, ip, code))| {
                let ip = format!("{}.{}.{}.{}", ip[0], ip[1], ip[2], ip[3]);
                let mut printer = Printer::new(format!("p{}", i), name.clone())
                    .with_connection(ip, code.clone(), format!("SER{:04}", i));
                printer.model = model.clone();
                printer
            })
            .collect();

        let content = Exporter::export(
            &printers,
            format,
            ExportOptions { include_access_codes: true },
        )
        .unwrap();
        let result = Importer::new()
            .import_str(&content, format, ImportOptions::default())
            .unwrap();

        prop_assert!(result.success, "{:?}", result.errors);
        prop_assert_eq!(result.imported, printers.len());
        for (params, printer) in result.printers.iter().zip(&printers) {
            prop_assert_eq!(&params.name, &printer.name);
            prop_assert_eq!(&params.model, &printer.model);
            prop_assert_eq!(Some(&params.ip), printer.ip.as_ref());
            prop_assert_eq!(Some(&params.serial), printer.serial.as_ref());
        }
    }
}
