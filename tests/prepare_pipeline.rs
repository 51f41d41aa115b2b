use std::fs;
use std::path::Path;

use ferrite_faces::dataset::{self, discover, index_dataset, store, Partition};
use ferrite_faces::{DatasetLayout, Error, FormatError, RasterImage, ShapeError};

fn write_raster(path: &Path, image: &RasterImage) {
    fs::write(path, image.to_bytes()).unwrap();
}

/// A 92x112 raster whose first two samples name its subject and pose.
fn tagged(subject: usize, pose: usize) -> RasterImage {
    let mut data = vec![0u8; 92 * 112];
    data[0] = subject as u8;
    data[1] = pose as u8;
    data[92 * 112 - 1] = (subject * 10 + pose) as u8;
    RasterImage::from_raw(92, 112, data).unwrap()
}

/// `s1..sN` folders holding `1.pgm..10.pgm`, written in reverse order.
fn write_subjects(root: &Path, subjects: usize) {
    for s in (1..=subjects).rev() {
        let dir = root.join(format!("s{}", s));
        fs::create_dir_all(&dir).unwrap();
        for pose in (1..=10).rev() {
            write_raster(&dir.join(format!("{}.pgm", pose)), &tagged(s - 1, pose));
        }
    }
}

#[test]
fn forty_subjects_fill_seven_train_and_three_test_slots_each() {
    let root = tempfile::tempdir().unwrap();
    write_subjects(root.path(), 40);
    fs::write(root.path().join("README"), "not a raster").unwrap();

    let layout = DatasetLayout { subjects: Some(40), ..DatasetLayout::default() };
    let split = dataset::prepare(root.path(), &layout).unwrap();

    assert_eq!(split.train_images.shape, vec![280, 1, 112, 92]);
    assert_eq!(split.test_images.shape, vec![120, 1, 112, 92]);
    assert_eq!(split.train_labels.len(), 280);
    assert_eq!(split.test_labels.len(), 120);

    for subject in 0..40u8 {
        let train = split.train_labels.data.iter().filter(|&&l| l == subject).count();
        let test = split.test_labels.data.iter().filter(|&&l| l == subject).count();
        assert_eq!((train, test), (7, 3), "subject {}", subject);
    }

    // Subject-major slots, poses in discovery order within each subject.
    for slot in 0..280 {
        let image = split.train_images.entry(slot).unwrap();
        assert_eq!(image[0] as usize, slot / 7);
        assert_eq!(image[1] as usize, slot % 7 + 1);
        assert_eq!(split.train_labels.data[slot] as usize, slot / 7);
    }
    for slot in 0..120 {
        let image = split.test_images.entry(slot).unwrap();
        assert_eq!(image[0] as usize, slot / 3);
        assert_eq!(image[1] as usize, slot % 3 + 8);
        assert_eq!(split.test_labels.data[slot] as usize, slot / 3);
    }
}

#[test]
fn single_subject_constant_planes() {
    let root = tempfile::tempdir().unwrap();
    let dir = root.path().join("s1");
    fs::create_dir(&dir).unwrap();
    for i in 1..=10u8 {
        write_raster(&dir.join(format!("{}.pgm", i)), &RasterImage::filled(92, 112, i));
    }

    let split = dataset::prepare(root.path(), &DatasetLayout::default()).unwrap();

    assert_eq!(split.train_images.len(), 7);
    assert_eq!(split.test_images.len(), 3);
    for slot in 0..7 {
        let plane = split.train_images.entry(slot).unwrap();
        assert!(plane.iter().all(|&v| v as usize == slot + 1), "train slot {}", slot);
    }
    for slot in 0..3 {
        let plane = split.test_images.entry(slot).unwrap();
        assert!(plane.iter().all(|&v| v as usize == slot + 8), "test slot {}", slot);
    }
    assert_eq!(split.train_labels.data, vec![0; 7]);
    assert_eq!(split.test_labels.data, vec![0; 3]);
}

#[test]
fn numeric_folder_names_are_walked_in_numeric_order() {
    let root = tempfile::tempdir().unwrap();
    for n in [10, 3, 1, 7, 2, 9, 5, 4, 8, 6] {
        let dir = root.path().join(n.to_string());
        fs::create_dir(&dir).unwrap();
        write_raster(&dir.join("1.pgm"), &RasterImage::filled(1, 1, n as u8));
    }

    let found = discover(root.path(), "pgm").unwrap();
    let folders: Vec<String> = found
        .iter()
        .map(|p| p.parent().unwrap().file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    let expected: Vec<String> = (1..=10).map(|n| n.to_string()).collect();
    assert_eq!(folders, expected);
}

#[test]
fn root_files_come_before_subfolders() {
    let root = tempfile::tempdir().unwrap();
    let sub = root.path().join("a");
    fs::create_dir(&sub).unwrap();
    write_raster(&sub.join("1.pgm"), &RasterImage::filled(1, 1, 0));
    write_raster(&root.path().join("10.pgm"), &RasterImage::filled(1, 1, 0));
    write_raster(&root.path().join("9.pgm"), &RasterImage::filled(1, 1, 0));
    fs::write(root.path().join("9.PGM"), "ignored").unwrap();

    let found = discover(root.path(), "pgm").unwrap();
    let expected = vec![root.path().join("9.pgm"), root.path().join("10.pgm"), sub.join("1.pgm")];
    assert_eq!(found, expected);
}

#[test]
fn incomplete_subject_is_a_shape_error() {
    let root = tempfile::tempdir().unwrap();
    write_subjects(root.path(), 2);
    fs::remove_file(root.path().join("s2").join("10.pgm")).unwrap();

    match index_dataset(root.path(), &DatasetLayout::default()) {
        Err(Error::Shape(ShapeError::NotMultiple { found, per_subject })) => {
            assert_eq!((found, per_subject), (19, 10));
        }
        other => panic!("expected a shape error, got {:?}", other),
    }
}

#[test]
fn empty_tree_is_a_shape_error() {
    let root = tempfile::tempdir().unwrap();
    assert!(matches!(
        dataset::prepare(root.path(), &DatasetLayout::default()),
        Err(Error::Shape(ShapeError::Empty { .. }))
    ));
}

#[test]
fn index_assigns_partitions_before_decoding() {
    let root = tempfile::tempdir().unwrap();
    write_subjects(root.path(), 1);

    let index = index_dataset(root.path(), &DatasetLayout::default()).unwrap();
    assert_eq!((index.subjects, index.train_len, index.test_len), (1, 7, 3));
    let test_files: Vec<_> = index
        .files
        .iter()
        .filter(|f| f.assignment.partition == Partition::Test)
        .map(|f| f.path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(test_files, vec!["8.pgm", "9.pgm", "10.pgm"]);
}

#[test]
fn corrupt_raster_aborts_the_build_with_its_path() {
    let root = tempfile::tempdir().unwrap();
    write_subjects(root.path(), 1);
    let bad = root.path().join("s1").join("4.pgm");
    let mut bytes = b"P5\n92 112\n255\n".to_vec();
    bytes.extend_from_slice(&[0u8; 100]);
    fs::write(&bad, bytes).unwrap();

    match dataset::prepare(root.path(), &DatasetLayout::default()) {
        Err(Error::Format { path, source: FormatError::Truncated { expected, actual } }) => {
            assert_eq!(path, bad);
            assert_eq!((expected, actual), (92 * 112, 100));
        }
        other => panic!("expected a format error, got {:?}", other),
    }
}

#[test]
fn wrong_size_raster_is_a_shape_error() {
    let root = tempfile::tempdir().unwrap();
    write_subjects(root.path(), 1);
    write_raster(&root.path().join("s1").join("2.pgm"), &RasterImage::filled(90, 112, 0));

    assert!(matches!(
        dataset::prepare(root.path(), &DatasetLayout::default()),
        Err(Error::Shape(ShapeError::ImageSize { width: 90, height: 112, .. }))
    ));
}

#[test]
fn prepared_dataset_survives_save_and_load() {
    let root = tempfile::tempdir().unwrap();
    write_subjects(root.path(), 3);
    let split = dataset::prepare(root.path(), &DatasetLayout::default()).unwrap();

    let out = tempfile::tempdir().unwrap();
    store::save_split(out.path(), &split).unwrap();
    let loaded = store::load_split(out.path()).unwrap();

    assert_eq!(loaded, split);
    assert_eq!(loaded.image_dims(), (112, 92));
}
