use crate::*;

/// Average the token vectors of `[N, L, D]` hidden states, counting only
/// positions whose attention mask is non-zero.
pub fn mean_pool(
    hidden: &[f32],
    shape: &[usize],
    attention_mask: &[i64],
) -> Result<Vec<Vec<f32>>, InferError> {
    let &[n, l, d] = shape else {
        return Err(InferError::Shape(format!(
            "expected [N, L, D] hidden states, got {:?}",
            shape
        )));
    };
    if hidden.len() != n * l * d || attention_mask.len() != n * l {
        return Err(InferError::Shape(format!(
            "hidden states {:?} and mask of {} do not match",
            shape,
            attention_mask.len()
        )));
    }

    let mut pooled = Vec::with_capacity(n);
    for (sequence, mask) in hidden.chunks_exact(l * d).zip(attention_mask.chunks_exact(l)) {
        let mut sum = vec![0.0f32; d];
        let mut count = 0usize;
        for (token, &keep) in sequence.chunks_exact(d).zip(mask) {
            if keep != 0 {
                for (acc, &v) in sum.iter_mut().zip(token) {
                    *acc += v;
                }
                count += 1;
            }
        }
        let divisor = count.max(1) as f32;
        pooled.push(sum.into_iter().map(|v| v / divisor).collect());
    }
    Ok(pooled)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ignores_padding_tokens() {
        // two sequences of 3 tokens with 2 dims, second one padded after 1 token
        let hidden = [
            1.0, 2.0, 3.0, 4.0, 5.0, 6.0, //
            10.0, 20.0, 99.0, 99.0, 99.0, 99.0,
        ];
        let mask = [1, 1, 1, 1, 0, 0];
        let pooled = mean_pool(&hidden, &[2, 3, 2], &mask).unwrap();
        assert_eq!(pooled, vec![vec![3.0, 4.0], vec![10.0, 20.0]]);
    }

    #[test]
    fn fully_masked_sequence_is_zero() {
        let pooled = mean_pool(&[5.0, 5.0], &[1, 1, 2], &[0]).unwrap();
        assert_eq!(pooled, vec![vec![0.0, 0.0]]);
    }

    #[test]
    fn rejects_mismatched_mask() {
        assert!(mean_pool(&[0.0; 4], &[1, 2, 2], &[1]).is_err());
    }
}
