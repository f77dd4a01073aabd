//! Classifier context: YAML config, preprocessing and a scripted backend

use photo_tensor::classifier::{Classifier, ClassifierError, InferenceBackend, ModelConfig};
use photo_tensor::{NormalizedTensor, Tier};
use std::io::Write;

/// Backend that scores by mean red-channel activation, one score per label
struct RednessBackend {
    labels: usize,
    calls: usize,
}

impl InferenceBackend for RednessBackend {
    fn forward(&mut self, input: &NormalizedTensor) -> Result<Vec<f32>, ClassifierError> {
        self.calls += 1;
        let red = input.channel_means()[0];
        Ok((0..self.labels).map(|i| red * i as f32).collect())
    }
}

fn write_config(yaml: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(yaml.as_bytes()).unwrap();
    file
}

#[test]
fn classify_with_yaml_config() {
    let file = write_config(
        "name: meal-classifier\nlabels: [salad, pasta, soup, fruit]\ntop_k: 2\n",
    );
    let config = ModelConfig::from_yaml(file.path()).unwrap();
    let backend = RednessBackend { labels: 4, calls: 0 };
    let mut classifier = Classifier::new(config, backend).unwrap();

    let result = classifier.classify("AAECAwQFBgcICQoLDA0ODw==").unwrap();
    assert_eq!(result.tier, Tier::Primary);
    assert_eq!(result.predictions.len(), 2);
    assert!(result.predictions[0].confidence >= result.predictions[1].confidence);

    let degraded = classifier.classify("").unwrap();
    assert!(degraded.degraded);
    assert_eq!(degraded.tier, Tier::Simulated);

    assert_eq!(classifier.into_backend().calls, 2);
}

#[test]
fn config_for_other_input_size_is_rejected() {
    let file = write_config("name: big\nlabels: [a]\ninput:\n  size: 384\n  mean: [0.485, 0.456, 0.406]\n  std: [0.229, 0.224, 0.225]\n");
    assert!(matches!(
        ModelConfig::from_yaml(file.path()),
        Err(ClassifierError::InvalidConfig(_))
    ));
}
