use core::error::Error;

/// Reasons a pod cannot be given a worker identity.
#[derive(Debug, derive_more::Display)]
pub enum MutationError {
    #[display("Pod {pod} in namespace {namespace} is missing node pool label {label}")]
    MissingNodePoolLabel {
        pod: String,
        namespace: String,
        label: String,
    },
    #[display("Pod in namespace {namespace} has neither generateName nor name")]
    MissingNamePrefix { namespace: String },
}

impl Error for MutationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mutation_error_display_formatting() {
        let missing_label = MutationError::MissingNodePoolLabel {
            pod: "ray-worker-".to_string(),
            namespace: "default".to_string(),
            label: "cloud.google.com/gke-nodepool".to_string(),
        };
        assert_eq!(
            missing_label.to_string(),
            "Pod ray-worker- in namespace default is missing node pool label \
             cloud.google.com/gke-nodepool"
        );

        let missing_prefix = MutationError::MissingNamePrefix {
            namespace: "ml".to_string(),
        };
        assert_eq!(
            missing_prefix.to_string(),
            "Pod in namespace ml has neither generateName nor name"
        );
    }
}
