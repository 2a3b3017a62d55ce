use pulseprint_transfer::{FileFormat, ImportOptions, Importer, TransferError};

#[tokio::test]
async fn test_import_each_file_type() {
    let dir = tempfile::tempdir().unwrap();
    let files = [
        (
            "printers.json",
            r#"[{"name":"Bench","ip":"10.0.0.5","accessCode":"abc","serial":"S1"}]"#,
        ),
        ("printers.csv", "name,ip,accessCode,serial\nBench,10.0.0.5,abc,S1\n"),
        (
            "printers.yml",
            "- name: Bench\n  ip: 10.0.0.5\n  access_code: abc\n  serial: S1\n",
        ),
        ("printers.txt", "name: Bench\nip: 10.0.0.5\naccessCode: abc\nserial: S1\n"),
    ];

    for (name, content) in files {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        let result = Importer::new()
            .import_file(&path, ImportOptions::default())
            .await
            .unwrap();
        assert!(result.success, "{}: {:?}", name, result.errors);
        assert_eq!(result.imported, 1, "{}", name);
        assert_eq!(result.printers[0].serial, "S1");
    }
}

#[tokio::test]
async fn test_unknown_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("printers.xml");
    std::fs::write(&path, "<printers/>").unwrap();
    assert!(matches!(
        Importer::new()
            .import_file(&path, ImportOptions::default())
            .await,
        Err(TransferError::UnsupportedFormat(_))
    ));
}

#[tokio::test]
async fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        Importer::new()
            .import_file(&dir.path().join("gone.json"), ImportOptions::default())
            .await,
        Err(TransferError::Io(_))
    ));
}

#[test]
fn test_duplicates_within_file() {
    let csv = "name,ip,accessCode,serial\nA,10.0.0.1,x,S1\nB,10.0.0.2,y,S1\n";
    let result = Importer::new()
        .import_str(csv, FileFormat::Csv, ImportOptions::default())
        .unwrap();
    assert_eq!(result.imported, 1);
    assert_eq!(result.skipped, 1);
    assert_eq!(result.printers[0].name, "A");
}
